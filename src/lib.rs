//! dual-logger - process-wide logging to a file and a colored console
//!
//! One [`LogFacade`] per process owns a file sink (truncated at start, accepts
//! everything) and a console sink (threshold from `CONSOLE_LOG_LEVEL`,
//! colored by severity). Structured data can be attached to any message and
//! is rendered as indented JSON.
//!
//! ```no_run
//! use dual_logger::LogFacade;
//! use serde_json::json;
//!
//! let log = LogFacade::init("app.log")?;
//! log.info("starting");
//! log.warning_with("disk low", &json!({"free_mb": 12}));
//! log.success("done");
//! # Ok::<(), dual_logger::FacadeError>(())
//! ```

#[macro_use]
mod macros;

pub mod bridge;
pub mod capture;
pub mod config;
pub mod error;
pub mod facade;
pub mod level;
pub mod origin;
pub mod payload;
pub mod presentation;
pub mod record;
pub mod sink;
pub mod template;

pub use bridge::{install_tracing_bridge, FacadeLayer};
pub use capture::CaptureBuffer;
pub use config::{ColorMode, ConsoleTarget, FacadeConfig, CONSOLE_LEVEL_ENV};
pub use error::FacadeError;
pub use facade::{LogFacade, LogFacadeBuilder};
pub use level::{register_level, Level};
pub use origin::Origin;
pub use payload::Payload;
pub use presentation::Banner;
