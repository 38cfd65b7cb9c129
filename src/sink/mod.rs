//! Output sinks
//!
//! A sink owns a destination, a minimum level and a formatter. The facade
//! holds exactly two: a file sink that accepts everything and a console sink
//! whose threshold comes from the environment.

mod console;
mod file;

use std::io;

pub use console::{level_color, paint, ConsoleSink};
pub use file::FileSink;

use crate::level::Level;
use crate::record::LogRecord;

/// A destination for formatted records
pub trait Sink: Send + Sync {
    /// Minimum level this sink emits
    fn threshold(&self) -> Level;

    /// Whether a record at `level` passes this sink's threshold
    fn enabled(&self, level: Level) -> bool {
        level >= self.threshold()
    }

    /// Format and write one record
    fn emit(&self, record: &LogRecord<'_>) -> io::Result<()>;
}
