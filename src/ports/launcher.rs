//! Launcher port for creating processes.

use std::future::Future;
use std::io;
use std::pin::Pin;

use tokio::io::AsyncRead;

use crate::format::format_command;
use crate::options::LaunchOptions;

/// Readable output channel of a running process.
pub type OutputReader = Pin<Box<dyn AsyncRead + Send>>;

/// Boxed future resolving once the process terminates.
///
/// Resolves to the exit code, `None` when the process was killed by a
/// signal, or an error when the process never started.
pub type ExitFuture = Pin<Box<dyn Future<Output = io::Result<Option<i32>>> + Send>>;

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    /// A program with discrete arguments and no shell parsing.
    Argv {
        /// Program name or path.
        program: String,
        /// Ordered arguments.
        args: Vec<String>,
    },
    /// A single string interpreted by the platform shell.
    Shell(String),
}

impl CommandSpec {
    /// Builds an argv command.
    pub fn argv<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::Argv { program: program.into(), args: args.into_iter().map(Into::into).collect() }
    }

    /// Builds a shell-string command.
    pub fn shell(command: impl Into<String>) -> Self {
        CommandSpec::Shell(command.into())
    }

    /// Program name or full shell string.
    #[must_use]
    pub fn command(&self) -> &str {
        match self {
            CommandSpec::Argv { program, .. } => program,
            CommandSpec::Shell(command) => command,
        }
    }

    /// Arguments for argv commands.
    #[must_use]
    pub fn args(&self) -> Option<&[String]> {
        match self {
            CommandSpec::Argv { args, .. } => Some(args),
            CommandSpec::Shell(_) => None,
        }
    }

    /// Human-readable command line.
    #[must_use]
    pub fn display(&self) -> String {
        format_command(self.command(), self.args())
    }

    /// Splits into the command and its optional argument list.
    #[must_use]
    pub fn into_parts(self) -> (String, Option<Vec<String>>) {
        match self {
            CommandSpec::Argv { program, args } => (program, Some(args)),
            CommandSpec::Shell(command) => (command, None),
        }
    }
}

/// A launched process as seen by the capture engine.
///
/// Either output channel may be absent, for instance when the launcher was
/// configured not to pipe it.
pub struct ProcessHandle {
    /// Piped standard output.
    pub stdout: Option<OutputReader>,
    /// Piped standard error.
    pub stderr: Option<OutputReader>,
    /// Termination notification.
    pub exit: ExitFuture,
}

impl ProcessHandle {
    /// A handle for a process that failed to start: no output channels, and
    /// an exit notification that reports `error`.
    #[must_use]
    pub fn failed(error: io::Error) -> Self {
        Self { stdout: None, stderr: None, exit: Box::pin(async move { Err::<Option<i32>, _>(error) }) }
    }
}

/// Everything a blocking argv launch captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutput {
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
    /// Exit code, or `None` when killed by a signal.
    pub status: Option<i32>,
}

/// Failure of a blocking shell-string launch.
///
/// The shell launch reports a non-zero exit as a failure. When `status`,
/// `stdout` and `stderr` are all present the process did run to completion;
/// any missing field marks a genuine start failure.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct ShellSyncFailure {
    /// Exit code, if the process ran and reported one.
    pub status: Option<i32>,
    /// Captured standard output, if any was collected.
    pub stdout: Option<Vec<u8>>,
    /// Captured standard error, if any was collected.
    pub stderr: Option<Vec<u8>>,
    /// Underlying error.
    pub source: io::Error,
}

impl ShellSyncFailure {
    /// A failure carrying nothing but the launcher error.
    #[must_use]
    pub fn start(source: io::Error) -> Self {
        Self { status: None, stdout: None, stderr: None, source }
    }
}

/// Creates processes.
///
/// The capture engine only consumes this interface; argument escaping,
/// environment setup and platform process creation are the launcher's job.
pub trait Launcher: Send + Sync {
    /// Starts `command` and returns its output channels and exit
    /// notification without blocking. A start failure is reported through
    /// [`ProcessHandle::exit`].
    fn spawn(&self, command: &CommandSpec, options: &LaunchOptions) -> ProcessHandle;

    /// Runs `command` to completion, blocking the calling thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be started.
    fn run_sync(&self, command: &CommandSpec, options: &LaunchOptions) -> io::Result<SyncOutput>;

    /// Runs a shell string to completion, blocking the calling thread, and
    /// returns its stdout when it exits with status 0.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellSyncFailure`] for a non-zero exit or a start failure.
    fn run_shell_sync(
        &self,
        command: &str,
        options: &LaunchOptions,
    ) -> Result<Vec<u8>, ShellSyncFailure>;
}
