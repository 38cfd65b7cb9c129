//! The process-wide log facade
//!
//! The first successful construction wins: it opens (and truncates) the log
//! file, reads `CONSOLE_LOG_LEVEL` and fixes both sinks for the lifetime of
//! the process. Every later call to [`LogFacade::get_or_create`] or
//! [`LogFacadeBuilder::install`] ignores its arguments and returns the same
//! shared instance. A different path on a later call is silently ignored.

use std::fmt;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::Local;
use colored::Color;
use serde::Serialize;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::{console_level_from_env, ColorMode, ConsoleTarget, FacadeConfig};
use crate::error::FacadeError;
use crate::level::{self, Level};
use crate::origin::Origin;
use crate::payload::{attach, Payload};
use crate::presentation::Banner;
use crate::record::{LogRecord, RecordFormatter};
use crate::sink::{paint, ConsoleSink, FileSink, Sink};
use crate::template::TimeFormat;

static GLOBAL: OnceLock<Arc<LogFacade>> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// File + console logger
pub struct LogFacade {
    name: String,
    file: FileSink,
    console: ConsoleSink,
    presentation: BoxMakeWriter,
    time_format: TimeFormat,
    presentation_timestamps: bool,
    presentation_ansi: bool,
}

/// Builder for a [`LogFacade`]
pub struct LogFacadeBuilder {
    path: PathBuf,
    config: FacadeConfig,
    console_level: Option<Level>,
    console_writer: Option<BoxMakeWriter>,
    presentation_writer: Option<BoxMakeWriter>,
}

impl LogFacadeBuilder {
    /// Use `config` for names, templates and console behaviour
    pub fn config(mut self, config: FacadeConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the console threshold instead of reading `CONSOLE_LOG_LEVEL`
    pub fn console_level(mut self, level: Level) -> Self {
        self.console_level = Some(level);
        self
    }

    /// Send console records somewhere other than the configured stream
    pub fn console_writer<M>(mut self, writer: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.console_writer = Some(BoxMakeWriter::new(writer));
        self
    }

    /// Send SUCCESS/FAILED/MESSAGE banners somewhere other than stdout
    pub fn presentation_writer<M>(mut self, writer: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.presentation_writer = Some(BoxMakeWriter::new(writer));
        self
    }

    /// Build a standalone facade without touching the process-wide instance
    ///
    /// Templates and the time format are validated before the log file is
    /// opened, so a bad template leaves an existing file untouched.
    pub fn build(self) -> Result<LogFacade, FacadeError> {
        let config = self.config;
        let file_formatter = RecordFormatter::new(&config.file_format, &config.time_format)?;
        let console_formatter =
            RecordFormatter::new(&config.console_format, &config.time_format)?;
        let time_format = TimeFormat::new(&config.time_format)?;

        let file = FileSink::open(&self.path, file_formatter)?;

        let threshold = self.console_level.unwrap_or_else(console_level_from_env);

        let (console_writer, console_tty) = match self.console_writer {
            Some(writer) => (writer, None),
            None => match config.console_target {
                ConsoleTarget::Stderr => (
                    BoxMakeWriter::new(std::io::stderr),
                    Some(std::io::stderr().is_terminal()),
                ),
                ConsoleTarget::Stdout => (
                    BoxMakeWriter::new(std::io::stdout),
                    Some(std::io::stdout().is_terminal()),
                ),
            },
        };
        let console_ansi = use_color(config.color, console_tty);
        let console = ConsoleSink::new(threshold, console_formatter, console_writer, console_ansi);

        let (presentation, presentation_tty) = match self.presentation_writer {
            Some(writer) => (writer, None),
            None => (
                BoxMakeWriter::new(std::io::stdout),
                Some(std::io::stdout().is_terminal()),
            ),
        };
        let presentation_ansi = use_color(config.color, presentation_tty);

        tracing::debug!(
            path = %self.path.display(),
            console_level = %threshold,
            console_ansi,
            presentation_ansi,
            "log facade initialised"
        );

        Ok(LogFacade {
            name: config.name,
            file,
            console,
            presentation,
            time_format,
            presentation_timestamps: config.presentation_timestamps,
            presentation_ansi,
        })
    }

    /// Build and install the process-wide facade, or return the existing one
    ///
    /// If a facade is already installed this builder is dropped unused. If
    /// construction fails nothing is installed and a later call may retry.
    pub fn install(self) -> Result<Arc<LogFacade>, FacadeError> {
        if let Some(existing) = GLOBAL.get() {
            return Ok(Arc::clone(existing));
        }

        let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = GLOBAL.get() {
            return Ok(Arc::clone(existing));
        }

        let facade = Arc::new(self.build()?);
        let installed = GLOBAL.get_or_init(|| Arc::clone(&facade));
        Ok(Arc::clone(installed))
    }
}

/// Whether to paint a destination; `None` marks an injected writer
///
/// Injected writers are only colored when the mode is `Always`.
fn use_color(mode: ColorMode, terminal: Option<bool>) -> bool {
    match terminal {
        Some(terminal) => mode.enabled(terminal),
        None => mode == ColorMode::Always,
    }
}

impl LogFacade {
    /// Start building a facade that logs to `path`
    pub fn builder(path: impl AsRef<Path>) -> LogFacadeBuilder {
        LogFacadeBuilder {
            path: path.as_ref().to_path_buf(),
            config: FacadeConfig::default(),
            console_level: None,
            console_writer: None,
            presentation_writer: None,
        }
    }

    /// Return the process-wide facade, creating it on first use
    ///
    /// Only the first successful call's arguments take effect.
    pub fn get_or_create(
        path: impl AsRef<Path>,
        config: FacadeConfig,
    ) -> Result<Arc<Self>, FacadeError> {
        Self::builder(path).config(config).install()
    }

    /// [`LogFacade::get_or_create`] with the default configuration
    pub fn init(path: impl AsRef<Path>) -> Result<Arc<Self>, FacadeError> {
        Self::get_or_create(path, FacadeConfig::default())
    }

    /// The process-wide facade, if one has been created
    pub fn global() -> Option<Arc<Self>> {
        GLOBAL.get().cloned()
    }

    /// Logger name used by `%(name)s`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the log file
    pub fn file_path(&self) -> &Path {
        self.file.path()
    }

    /// Minimum level written to the console
    pub fn console_threshold(&self) -> Level {
        self.console.threshold()
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log_at(Level::DEBUG, message);
    }

    #[track_caller]
    pub fn debug_with<T: Serialize + ?Sized>(&self, message: impl fmt::Display, data: &T) {
        self.log_at_with(Level::DEBUG, message, data);
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log_at(Level::INFO, message);
    }

    #[track_caller]
    pub fn info_with<T: Serialize + ?Sized>(&self, message: impl fmt::Display, data: &T) {
        self.log_at_with(Level::INFO, message, data);
    }

    /// Log at WARNING, prefixed with the caller's location
    #[track_caller]
    pub fn warning(&self, message: impl fmt::Display) {
        self.log_at(Level::WARNING, message);
    }

    #[track_caller]
    pub fn warning_with<T: Serialize + ?Sized>(&self, message: impl fmt::Display, data: &T) {
        self.log_at_with(Level::WARNING, message, data);
    }

    /// Log at ERROR, prefixed with the caller's location
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log_at(Level::ERROR, message);
    }

    #[track_caller]
    pub fn error_with<T: Serialize + ?Sized>(&self, message: impl fmt::Display, data: &T) {
        self.log_at_with(Level::ERROR, message, data);
    }

    /// Log at CRITICAL, prefixed with the caller's location
    #[track_caller]
    pub fn critical(&self, message: impl fmt::Display) {
        self.log_at(Level::CRITICAL, message);
    }

    #[track_caller]
    pub fn critical_with<T: Serialize + ?Sized>(&self, message: impl fmt::Display, data: &T) {
        self.log_at_with(Level::CRITICAL, message, data);
    }

    /// Log at any level, including registered custom levels
    #[track_caller]
    pub fn log_at(&self, level: Level, message: impl fmt::Display) {
        self.dispatch(level, Some(Origin::caller()), message.to_string(), None);
    }

    /// Log at any level with structured data
    ///
    /// `data` is only attached when it serializes to a non-empty object or
    /// array; otherwise the message is logged as-is.
    #[track_caller]
    pub fn log_at_with<T: Serialize + ?Sized>(
        &self,
        level: Level,
        message: impl fmt::Display,
        data: &T,
    ) {
        self.dispatch(
            level,
            Some(Origin::caller()),
            message.to_string(),
            Payload::render(data),
        );
    }

    /// Log at a level resolved by name
    #[track_caller]
    pub fn log_named(
        &self,
        level_name: &str,
        message: impl fmt::Display,
    ) -> Result<(), FacadeError> {
        let level = Level::lookup(level_name)
            .ok_or_else(|| FacadeError::UnknownLevel(level_name.to_string()))?;
        self.log_at(level, message);
        Ok(())
    }

    /// Log with an explicit call site; used by the logging macros
    pub fn log_with_origin(
        &self,
        level: Level,
        origin: Origin,
        message: impl fmt::Display,
        payload: Option<Payload>,
    ) {
        self.dispatch(level, Some(origin), message.to_string(), payload);
    }

    /// Register a custom level for the whole process
    ///
    /// Log at it with [`LogFacade::log_at`] or [`LogFacade::log_named`].
    pub fn add_custom_level(&self, name: &str, value: u32) -> Result<Level, FacadeError> {
        level::register_level(name, value)
    }

    pub fn success(&self, message: impl fmt::Display) {
        self.banner(Banner::Success, message.to_string(), None);
    }

    pub fn success_with<T: Serialize + ?Sized>(&self, message: impl fmt::Display, data: &T) {
        self.banner(Banner::Success, message.to_string(), Payload::render(data));
    }

    pub fn failed(&self, message: impl fmt::Display) {
        self.banner(Banner::Failed, message.to_string(), None);
    }

    pub fn failed_with<T: Serialize + ?Sized>(&self, message: impl fmt::Display, data: &T) {
        self.banner(Banner::Failed, message.to_string(), Payload::render(data));
    }

    pub fn message(&self, message: impl fmt::Display) {
        self.banner(Banner::Message, message.to_string(), None);
    }

    pub fn message_with<T: Serialize + ?Sized>(&self, message: impl fmt::Display, data: &T) {
        self.banner(Banner::Message, message.to_string(), Payload::render(data));
    }

    /// Print an error with its cause chain (and backtrace, when captured) to the console
    ///
    /// Bypasses the console threshold and the log file.
    pub fn exception(&self, err: &anyhow::Error) {
        let _ = self.console.write_painted(&format!("{:?}", err), Color::Red);
    }

    /// Route one message through both sinks
    ///
    /// WARNING and above are prefixed with the origin label when an origin
    /// is known. Write failures are ignored.
    pub(crate) fn dispatch(
        &self,
        level: Level,
        origin: Option<Origin>,
        message: String,
        payload: Option<Payload>,
    ) {
        if level < Level::DEBUG {
            return;
        }

        let mut message = attach(message, payload.as_ref());
        if level >= Level::WARNING {
            if let Some(origin) = &origin {
                message = format!("{} | {}", origin.label(), message);
            }
        }

        let record = LogRecord::new(level, &self.name, &message, origin);
        let sinks: [&dyn Sink; 2] = [&self.file, &self.console];
        for sink in sinks {
            if sink.enabled(level) {
                let _ = sink.emit(&record);
            }
        }
    }

    fn banner(&self, banner: Banner, message: String, payload: Option<Payload>) {
        let message = attach(message, payload.as_ref());
        let now = Local::now();
        let timestamp = self
            .presentation_timestamps
            .then_some((&self.time_format, &now));

        let mut line = banner.line(&message, timestamp);
        if self.presentation_ansi {
            line = paint(&line, banner.color());
        }
        line.push('\n');

        let mut writer = self.presentation.make_writer();
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

impl fmt::Debug for LogFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFacade")
            .field("name", &self.name)
            .field("file", &self.file)
            .field("console", &self.console)
            .field("presentation_timestamps", &self.presentation_timestamps)
            .finish_non_exhaustive()
    }
}
