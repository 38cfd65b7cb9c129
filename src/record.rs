//! Log records and their text formatting

use std::borrow::Cow;

use chrono::{DateTime, Local};

use crate::error::FacadeError;
use crate::level::Level;
use crate::origin::Origin;
use crate::template::{Field, FieldValue, FieldValues, Template, TimeFormat};

const UNKNOWN_FUNCTION: &str = "(unknown function)";
const UNKNOWN_FILE: &str = "(unknown file)";

/// A single log event as seen by the sinks
///
/// Records are built per call and never stored.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    /// When the call was made
    pub timestamp: DateTime<Local>,
    /// Severity
    pub level: Level,
    /// Logger name
    pub logger: &'a str,
    /// Final message text, including any origin prefix and payload block
    pub message: &'a str,
    /// Call site, if known
    pub origin: Option<Origin>,
    /// Name of the calling thread, if it has one
    pub thread: Option<String>,
}

impl<'a> LogRecord<'a> {
    /// Create a record stamped with the current local time and thread
    pub fn new(level: Level, logger: &'a str, message: &'a str, origin: Option<Origin>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            logger,
            message,
            origin,
            thread: std::thread::current().name().map(str::to_string),
        }
    }
}

struct RecordFields<'r, 'a> {
    record: &'r LogRecord<'a>,
    asctime: String,
}

impl FieldValues for RecordFields<'_, '_> {
    fn value(&self, field: Field) -> FieldValue<'_> {
        let origin = self.record.origin.as_ref();
        match field {
            Field::Asctime => FieldValue::Text(Cow::Borrowed(&self.asctime)),
            Field::Name => FieldValue::Text(Cow::Borrowed(self.record.logger)),
            Field::LevelName => FieldValue::Text(self.record.level.name()),
            Field::LevelNo => FieldValue::Number(i64::from(self.record.level.value())),
            Field::Message => FieldValue::Text(Cow::Borrowed(self.record.message)),
            // Method calls only know file and line; name the module instead
            Field::FuncName => FieldValue::Text(Cow::Borrowed(origin.map_or(
                UNKNOWN_FUNCTION,
                |o| o.function_name().unwrap_or_else(|| o.module()),
            ))),
            Field::LineNo => FieldValue::Number(origin.map_or(0, |o| i64::from(o.line()))),
            Field::FileName => FieldValue::Text(Cow::Borrowed(
                origin.map_or(UNKNOWN_FILE, Origin::file_name),
            )),
            Field::PathName => {
                FieldValue::Text(Cow::Borrowed(origin.map_or(UNKNOWN_FILE, Origin::file)))
            }
            Field::Module => {
                FieldValue::Text(Cow::Borrowed(origin.map_or("Unknown module", Origin::module)))
            }
            Field::Process => FieldValue::Number(i64::from(std::process::id())),
            Field::ThreadName => FieldValue::Text(Cow::Borrowed(
                self.record.thread.as_deref().unwrap_or("unnamed"),
            )),
        }
    }
}

/// Turns records into lines using a template and a time format
#[derive(Debug, Clone)]
pub struct RecordFormatter {
    template: Template,
    time_format: TimeFormat,
}

impl RecordFormatter {
    /// Parse `template` and validate `time_format`
    pub fn new(template: &str, time_format: &str) -> Result<Self, FacadeError> {
        Ok(Self {
            template: Template::parse(template)?,
            time_format: TimeFormat::new(time_format)?,
        })
    }

    /// The template this formatter renders
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// The time format used for `%(asctime)s`
    pub fn time_format(&self) -> &TimeFormat {
        &self.time_format
    }

    /// Format a record without a trailing newline
    pub fn format(&self, record: &LogRecord<'_>) -> String {
        let asctime = if self.template.uses(Field::Asctime) {
            self.time_format.format(&record.timestamp)
        } else {
            String::new()
        };
        self.template.render(&RecordFields { record, asctime })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record<'a>(level: Level, message: &'a str, origin: Option<Origin>) -> LogRecord<'a> {
        let mut record = LogRecord::new(level, "root", message, origin);
        record.timestamp = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        record
    }

    #[test]
    fn test_default_file_layout() {
        let formatter = RecordFormatter::new(
            "%(asctime)s | %(name)s | %(levelname)-8s | %(funcName)s:%(lineno)d - %(message)s",
            "%Y-%m-%d %H:%M:%S",
        )
        .unwrap();
        let origin = Origin::new("src/app.rs", 17, Some("app::run"));
        let line = formatter.format(&record(Level::WARNING, "disk low", Some(origin)));
        assert_eq!(
            line,
            "2024-05-01 12:30:00 | root | WARNING  | run:17 - disk low"
        );
    }

    #[test]
    fn test_missing_origin_placeholders() {
        let formatter =
            RecordFormatter::new("%(funcName)s %(filename)s %(lineno)d", "%H").unwrap();
        let line = formatter.format(&record(Level::INFO, "x", None));
        assert_eq!(line, "(unknown function) (unknown file) 0");
    }

    #[test]
    fn test_func_name_falls_back_to_module() {
        let formatter = RecordFormatter::new(
            "%(asctime)s | %(name)s | %(levelname)-8s | %(funcName)s:%(lineno)d - %(message)s",
            "%Y-%m-%d %H:%M:%S",
        )
        .unwrap();
        let origin = Origin::new("src/worker.rs", 88, None);
        let line = formatter.format(&record(Level::INFO, "started", Some(origin)));
        assert_eq!(line, "2024-05-01 12:30:00 | root | INFO     | worker:88 - started");
    }

    #[test]
    fn test_levelno_and_module() {
        let formatter = RecordFormatter::new("%(levelno)d %(module)s", "%H").unwrap();
        let origin = Origin::new("src/sink/console.rs", 1, None);
        let line = formatter.format(&record(Level::ERROR, "x", Some(origin)));
        assert_eq!(line, "40 console");
    }

    #[test]
    fn test_invalid_parts_are_rejected() {
        assert!(RecordFormatter::new("%(bogus)s", "%H").is_err());
        assert!(RecordFormatter::new("%(message)s", "%!").is_err());
    }
}
