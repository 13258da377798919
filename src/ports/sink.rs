//! Output sink port for the host's own stdout and stderr.

use std::fmt;
use std::io;

/// One of the two output channels of a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        })
    }
}

/// Destination for debug mirroring of captured output.
///
/// The live implementation writes to the host's terminal; tests substitute
/// a capturing sink so mirrored bytes can be asserted exactly.
pub trait OutputSink: Send + Sync {
    /// Writes `bytes` to the destination matching `stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying destination rejects the write.
    fn write(&self, stream: StreamKind, bytes: &[u8]) -> io::Result<()>;
}
