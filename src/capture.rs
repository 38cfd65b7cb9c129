//! In-memory output capture
//!
//! Provides a thread-safe buffer that can stand in for stdout or stderr as a
//! console destination, so hosts and tests can observe what the facade prints.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

/// Shared byte buffer usable as a `MakeWriter`
///
/// Clones share the same underlying storage.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Written output split into lines
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        bytes.is_empty()
    }

    /// Discard everything written so far
    pub fn clear(&self) {
        let mut bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        bytes.clear();
    }
}

/// Writer handed out by [`CaptureBuffer`]
pub struct CaptureWriter {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureBuffer {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            bytes: Arc::clone(&self.bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_write_and_read() {
        let buffer = CaptureBuffer::new();
        assert!(buffer.is_empty());

        buffer.make_writer().write_all(b"one\ntwo\n").unwrap();

        assert!(!buffer.is_empty());
        assert_eq!(buffer.lines(), vec!["one", "two"]);
    }

    #[test]
    fn test_clones_share_storage() {
        let buffer = CaptureBuffer::new();
        let clone = buffer.clone();

        clone.make_writer().write_all(b"shared").unwrap();
        assert_eq!(buffer.contents(), "shared");

        buffer.clear();
        assert!(clone.is_empty());
    }

    #[test]
    fn test_survives_poisoned_lock() {
        let buffer = CaptureBuffer::new();
        buffer.make_writer().write_all(b"kept").unwrap();

        let storage = Arc::clone(&buffer.bytes);
        let _ = std::thread::spawn(move || {
            let _held = storage.lock().unwrap();
            panic!("writer thread died");
        })
        .join();
        assert!(buffer.bytes.is_poisoned());

        assert!(!buffer.is_empty());
        assert_eq!(buffer.contents(), "kept");
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
