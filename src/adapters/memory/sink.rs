//! Capturing adapter for the `OutputSink` port.

use std::io;

use parking_lot::Mutex;

use crate::ports::sink::{OutputSink, StreamKind};

/// Sink that records every write instead of printing it.
#[derive(Debug, Default)]
pub struct CapturingSink {
    writes: Mutex<Vec<(StreamKind, Vec<u8>)>>,
    fail: bool,
}

impl CapturingSink {
    /// Creates an empty capturing sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that rejects every write.
    #[must_use]
    pub fn failing() -> Self {
        Self { writes: Mutex::default(), fail: true }
    }

    /// Every accepted write, in call order.
    #[must_use]
    pub fn writes(&self) -> Vec<(StreamKind, Vec<u8>)> {
        self.writes.lock().clone()
    }

    /// Concatenation of everything written to stdout.
    #[must_use]
    pub fn stdout(&self) -> Vec<u8> {
        self.collect(StreamKind::Stdout)
    }

    /// Concatenation of everything written to stderr.
    #[must_use]
    pub fn stderr(&self) -> Vec<u8> {
        self.collect(StreamKind::Stderr)
    }

    fn collect(&self, stream: StreamKind) -> Vec<u8> {
        self.writes
            .lock()
            .iter()
            .filter(|(kind, _)| *kind == stream)
            .flat_map(|(_, bytes)| bytes.iter().copied())
            .collect()
    }
}

impl OutputSink for CapturingSink {
    fn write(&self, stream: StreamKind, bytes: &[u8]) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "capturing sink closed"));
        }
        self.writes.lock().push((stream, bytes.to_vec()));
        Ok(())
    }
}
