//! Error types surfaced by launches and by the result accessors.

use std::fmt;
use std::io;

use crate::format::format_command;
use crate::ports::sink::StreamKind;

/// Errors produced while launching a process or reading its result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The process could not be created at all (missing executable,
    /// permission denied, ...).
    #[error("failed to start `{command}`: {source}")]
    Start {
        /// Formatted command line that failed to start.
        command: String,
        /// Underlying launcher error.
        source: io::Error,
    },

    /// An output channel failed while it was being drained.
    #[error("failed to read {stream}: {source}")]
    Stream {
        /// Which channel failed.
        stream: StreamKind,
        /// Underlying read error.
        source: io::Error,
    },

    /// The process ran to completion with a non-zero status.
    #[error(transparent)]
    NonZeroExit(Box<NonZeroExit>),
}

impl Error {
    /// Stable tag identifying the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Start { .. } => "START_FAILURE",
            Error::Stream { .. } => "STREAM_FAILURE",
            Error::NonZeroExit(_) => NonZeroExit::KIND,
        }
    }

    /// Returns the non-zero exit details, if this is that kind of error.
    #[must_use]
    pub fn as_non_zero_exit(&self) -> Option<&NonZeroExit> {
        match self {
            Error::NonZeroExit(exit) => Some(exit),
            _ => None,
        }
    }
}

impl From<NonZeroExit> for Error {
    fn from(exit: NonZeroExit) -> Self {
        Error::NonZeroExit(Box::new(exit))
    }
}

/// Details of a process that exited with a non-zero status.
///
/// Produced only by the lazy accessors on
/// [`ProcessResult`](crate::ProcessResult); building a result never fails
/// because of its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonZeroExit {
    /// The exit status reported by the process.
    pub status: i32,
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
    /// Program name or shell string.
    pub command: String,
    /// Arguments for argv launches, `None` for shell strings.
    pub args: Option<Vec<String>>,
}

impl NonZeroExit {
    /// Kind tag shared with [`Error::kind`].
    pub const KIND: &'static str = "NON_ZERO_EXIT_CODE";
}

impl fmt::Display for NonZeroExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} exited with code {}:\n{}",
            format_command(&self.command, self.args.as_deref()),
            self.status,
            String::from_utf8_lossy(&self.stderr)
        )
    }
}

impl std::error::Error for NonZeroExit {}

#[cfg(test)]
mod tests {
    use super::*;

    fn exit() -> NonZeroExit {
        NonZeroExit {
            status: 2,
            stdout: b"partial".to_vec(),
            stderr: b"no such file".to_vec(),
            command: "ls".into(),
            args: Some(vec!["my dir".into()]),
        }
    }

    #[test]
    fn non_zero_exit_message_format() {
        assert_eq!(exit().to_string(), "ls \"my dir\" exited with code 2:\nno such file");
    }

    #[test]
    fn wrapped_error_displays_transparently() {
        let err = Error::from(exit());
        assert_eq!(err.to_string(), exit().to_string());
        assert_eq!(err.kind(), "NON_ZERO_EXIT_CODE");
        assert_eq!(err.as_non_zero_exit().map(|e| e.status), Some(2));
    }

    #[test]
    fn start_and_stream_kinds() {
        let start = Error::Start {
            command: "nope".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(start.kind(), "START_FAILURE");
        assert!(start.to_string().starts_with("failed to start `nope`"));
        assert!(start.as_non_zero_exit().is_none());

        let stream = Error::Stream {
            stream: StreamKind::Stderr,
            source: io::Error::from(io::ErrorKind::BrokenPipe),
        };
        assert_eq!(stream.kind(), "STREAM_FAILURE");
        assert!(stream.to_string().starts_with("failed to read stderr"));
    }
}
