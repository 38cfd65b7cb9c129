//! Colored console sink

use std::fmt;
use std::io::{self, Write};

use colored::Color;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

use super::Sink;
use crate::level::Level;
use crate::record::{LogRecord, RecordFormatter};

/// Console color for a severity
///
/// Custom levels named `SUCCESS` or `FAILED` get bright green or bright red.
/// Everything else without a dedicated color (CRITICAL and other custom
/// levels) is magenta.
pub fn level_color(level: Level) -> Color {
    match level {
        Level::DEBUG => Color::Blue,
        Level::INFO => Color::Cyan,
        Level::WARNING => Color::Yellow,
        Level::ERROR => Color::Red,
        Level::CRITICAL => Color::Magenta,
        custom => match custom.name().as_ref() {
            "SUCCESS" => Color::BrightGreen,
            "FAILED" => Color::BrightRed,
            _ => Color::Magenta,
        },
    }
}

/// Wrap `text` in the ANSI sequence for `color` and a reset
///
/// Always emits escapes; callers decide per destination whether to paint.
pub fn paint(text: &str, color: Color) -> String {
    format!("\x1b[{}m{}\x1b[0m", color.to_fg_str(), text)
}

/// Writes records at or above its threshold to a terminal-like destination
pub struct ConsoleSink {
    threshold: Level,
    formatter: RecordFormatter,
    writer: BoxMakeWriter,
    ansi: bool,
}

impl ConsoleSink {
    /// Create a console sink
    ///
    /// With `ansi` false lines are written without any color escapes.
    pub fn new(
        threshold: Level,
        formatter: RecordFormatter,
        writer: BoxMakeWriter,
        ansi: bool,
    ) -> Self {
        Self {
            threshold,
            formatter,
            writer,
            ansi,
        }
    }

    /// Write an already-formatted block, painted with `color` when enabled
    ///
    /// Used for output that bypasses thresholds, such as error reports.
    pub fn write_painted(&self, text: &str, color: Color) -> io::Result<()> {
        let mut line = if self.ansi {
            paint(text, color)
        } else {
            text.to_string()
        };
        line.push('\n');

        let mut writer = self.writer.make_writer();
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}

impl Sink for ConsoleSink {
    fn threshold(&self) -> Level {
        self.threshold
    }

    fn emit(&self, record: &LogRecord<'_>) -> io::Result<()> {
        let line = self.formatter.format(record);
        self.write_painted(&line, level_color(record.level))
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("threshold", &self.threshold)
            .field("formatter", &self.formatter)
            .field("ansi", &self.ansi)
            .finish_non_exhaustive()
    }
}
