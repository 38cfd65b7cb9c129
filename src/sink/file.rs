//! Plain-text file sink
//!
//! The file is truncated when the sink is opened and then appended to for the
//! rest of the process. There is no rotation.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::Sink;
use crate::error::FacadeError;
use crate::level::Level;
use crate::record::{LogRecord, RecordFormatter};

/// Writes every record at DEBUG or above to a file, uncolored
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
    formatter: RecordFormatter,
}

impl FileSink {
    /// Open `path` in truncate mode
    ///
    /// The parent directory must already exist.
    pub fn open(path: &Path, formatter: RecordFormatter) -> Result<Self, FacadeError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|source| FacadeError::OpenLogFile {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            formatter,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn threshold(&self) -> Level {
        Level::DEBUG
    }

    fn emit(&self, record: &LogRecord<'_>) -> io::Result<()> {
        let mut line = self.formatter.format(record);
        line.push('\n');

        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(line.as_bytes())?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn formatter() -> RecordFormatter {
        RecordFormatter::new("%(levelname)s | %(message)s", "%H:%M:%S").unwrap()
    }

    #[test]
    fn test_open_truncates_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");
        std::fs::write(&path, "stale content\n").unwrap();

        let sink = FileSink::open(&path, formatter()).unwrap();
        assert_eq!(std::fs::read_to_string(sink.path()).unwrap(), "");
    }

    #[test]
    fn test_emit_appends_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");
        let sink = FileSink::open(&path, formatter()).unwrap();

        sink.emit(&LogRecord::new(Level::DEBUG, "root", "first", None))
            .unwrap();
        sink.emit(&LogRecord::new(Level::CRITICAL, "root", "second", None))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "DEBUG | first\nCRITICAL | second\n");
    }

    #[test]
    fn test_accepts_every_standard_level() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSink::open(&temp_dir.path().join("app.log"), formatter()).unwrap();
        for level in [
            Level::DEBUG,
            Level::INFO,
            Level::WARNING,
            Level::ERROR,
            Level::CRITICAL,
        ] {
            assert!(sink.enabled(level));
        }
        assert!(!sink.enabled(Level::from_value(5)));
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("app.log");
        let err = FileSink::open(&path, formatter()).unwrap_err();
        assert!(matches!(err, FacadeError::OpenLogFile { .. }));
    }
}
