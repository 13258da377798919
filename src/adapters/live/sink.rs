//! Live output sink writing to the host's own stdout and stderr.

use std::io::{self, Write};

use crate::ports::sink::{OutputSink, StreamKind};

/// Sink that forwards mirrored output to this process's terminal.
pub struct TerminalSink;

impl OutputSink for TerminalSink {
    fn write(&self, stream: StreamKind, bytes: &[u8]) -> io::Result<()> {
        match stream {
            StreamKind::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(bytes)?;
                out.flush()
            }
            StreamKind::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(bytes)?;
                err.flush()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_empty_writes() {
        let sink = TerminalSink;
        assert!(sink.write(StreamKind::Stdout, b"").is_ok());
        assert!(sink.write(StreamKind::Stderr, b"").is_ok());
    }
}
