//! The immutable outcome of one launch.

use crate::encoding::Encoding;
use crate::error::{Error, NonZeroExit};

/// Captured output and exit status of a process that ran.
///
/// A `ProcessResult` is built once all of its parts are known and never
/// changes afterwards. Building one never fails because of the exit status:
/// that decision is deferred to [`get_result`](Self::get_result) and its
/// siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    command: String,
    args: Option<Vec<String>>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    status: Option<i32>,
}

impl ProcessResult {
    /// Assembles a result from its parts.
    #[must_use]
    pub fn new(
        command: impl Into<String>,
        args: Option<Vec<String>>,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        status: Option<i32>,
    ) -> Self {
        Self { command: command.into(), args, stdout, stderr, status }
    }

    /// Program name or full shell string.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Arguments of an argv launch; `None` for shell strings.
    #[must_use]
    pub fn args(&self) -> Option<&[String]> {
        self.args.as_deref()
    }

    /// Everything the process wrote to standard output.
    #[must_use]
    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    /// Everything the process wrote to standard error.
    #[must_use]
    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    /// Exit code, or `None` when the process was killed by a signal.
    #[must_use]
    pub fn status(&self) -> Option<i32> {
        self.status
    }

    /// Returns stdout, or a [`NonZeroExit`] error when the status is
    /// present and non-zero. Output on stderr alone is not a failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonZeroExit`] for a non-zero status.
    pub fn get_result(&self) -> Result<&[u8], Error> {
        self.check_status()?;
        Ok(&self.stdout)
    }

    /// Like [`get_result`](Self::get_result), decoding stdout as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonZeroExit`] for a non-zero status, whatever the
    /// encoding.
    pub fn get_result_as(&self, encoding: Encoding) -> Result<String, Error> {
        self.get_result().map(|bytes| encoding.decode(bytes))
    }

    /// Consuming form of [`get_result`](Self::get_result).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonZeroExit`] for a non-zero status.
    pub fn into_result(self) -> Result<Vec<u8>, Error> {
        self.check_status()?;
        Ok(self.stdout)
    }

    fn check_status(&self) -> Result<(), Error> {
        match self.status {
            Some(status) if status != 0 => Err(NonZeroExit {
                status,
                stdout: self.stdout.clone(),
                stderr: self.stderr.clone(),
                command: self.command.clone(),
                args: self.args.clone(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}
