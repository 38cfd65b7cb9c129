//! Forward `tracing` events into a log facade
//!
//! Libraries instrumented with `tracing` can share the facade's file and
//! console by installing [`FacadeLayer`] in the subscriber stack.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::FacadeError;
use crate::facade::LogFacade;
use crate::level::Level;
use crate::origin::Origin;
use crate::payload::Payload;

/// Map a `tracing` level onto the facade's severities
///
/// TRACE has no counterpart and is folded into DEBUG.
pub fn map_level(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::TRACE | tracing::Level::DEBUG => Level::DEBUG,
        tracing::Level::INFO => Level::INFO,
        tracing::Level::WARN => Level::WARNING,
        tracing::Level::ERROR => Level::ERROR,
    }
}

/// Collects the `message` field and every other field as JSON
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl EventVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            let text = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
            self.message = Some(text);
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::from(format!("{:?}", value)));
    }
}

/// `tracing_subscriber` layer that logs every event through a facade
pub struct FacadeLayer {
    facade: Arc<LogFacade>,
}

impl FacadeLayer {
    pub fn new(facade: Arc<LogFacade>) -> Self {
        Self { facade }
    }
}

impl<S> Layer<S> for FacadeLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let origin = metadata
            .file()
            .map(|file| Origin::new(file, metadata.line().unwrap_or(0), None));
        let payload = Payload::from_value(&Value::Object(visitor.fields));

        self.facade.dispatch(
            map_level(metadata.level()),
            origin,
            visitor.message.unwrap_or_default(),
            payload,
        );
    }
}

impl LogFacade {
    /// A layer forwarding `tracing` events into this facade
    pub fn tracing_layer(self: &Arc<Self>) -> FacadeLayer {
        FacadeLayer::new(Arc::clone(self))
    }
}

/// Install a global `tracing` subscriber that forwards into `facade`
///
/// Events are filtered by `RUST_LOG` when set, otherwise everything at DEBUG
/// and above is forwarded. Fails if a global subscriber already exists.
pub fn install_tracing_bridge(facade: Arc<LogFacade>) -> Result<(), FacadeError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(FacadeLayer::new(facade))
        .try_init()
        .map_err(|err| FacadeError::Bridge(err.to_string()))
}
