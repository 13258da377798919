//! Scripted adapter for the `Launcher` port.

use std::collections::VecDeque;
use std::io;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio_util::io::StreamReader;

use crate::options::LaunchOptions;
use crate::ports::launcher::{
    CommandSpec, ExitFuture, Launcher, OutputReader, ProcessHandle, ShellSyncFailure, SyncOutput,
};

/// Builds an output channel that yields `chunks` one read at a time and
/// then closes. An `Err` chunk is reported as a read error.
#[must_use]
pub fn chunked_reader(chunks: Vec<io::Result<Vec<u8>>>) -> OutputReader {
    let stream = futures::stream::iter(chunks.into_iter().map(|chunk| chunk.map(Bytes::from)));
    Box::pin(StreamReader::new(stream))
}

/// How a scripted process terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedExit {
    /// Exits with a code, or `None` for a signal.
    Code(Option<i32>),
    /// Never started; the exit notification fails with this kind.
    StartFailure(io::ErrorKind),
    /// Never terminates.
    Pending,
}

/// One scripted asynchronous launch.
#[derive(Debug)]
pub struct ScriptedProcess {
    /// Chunks delivered on stdout, or `None` for no channel.
    pub stdout: Option<Vec<io::Result<Vec<u8>>>>,
    /// Chunks delivered on stderr, or `None` for no channel.
    pub stderr: Option<Vec<io::Result<Vec<u8>>>>,
    /// Termination behavior.
    pub exit: ScriptedExit,
}

impl ScriptedProcess {
    /// A process that writes `stdout` and `stderr` in one chunk each and
    /// exits with `status`.
    #[must_use]
    pub fn exits(stdout: &[u8], stderr: &[u8], status: i32) -> Self {
        Self {
            stdout: Some(vec![Ok(stdout.to_vec())]),
            stderr: Some(vec![Ok(stderr.to_vec())]),
            exit: ScriptedExit::Code(Some(status)),
        }
    }

    /// A process that never started.
    #[must_use]
    pub fn start_failure(kind: io::ErrorKind) -> Self {
        Self { stdout: None, stderr: None, exit: ScriptedExit::StartFailure(kind) }
    }

    fn into_handle(self) -> ProcessHandle {
        let exit: ExitFuture = match self.exit {
            ScriptedExit::Code(status) => Box::pin(async move { Ok::<_, io::Error>(status) }),
            ScriptedExit::StartFailure(kind) => {
                Box::pin(async move {
                    Err::<Option<i32>, _>(io::Error::new(kind, "scripted start failure"))
                })
            }
            ScriptedExit::Pending => Box::pin(futures::future::pending::<io::Result<Option<i32>>>()),
        };
        ProcessHandle {
            stdout: self.stdout.map(chunked_reader),
            stderr: self.stderr.map(chunked_reader),
            exit,
        }
    }
}

/// Launcher that replays queued outcomes and records what it was asked to
/// run. Each call consumes the next queued outcome of its kind; an empty
/// queue behaves like a start failure.
#[derive(Debug, Default)]
pub struct ScriptedLauncher {
    processes: Mutex<VecDeque<ScriptedProcess>>,
    sync_outputs: Mutex<VecDeque<io::Result<SyncOutput>>>,
    shell_outputs: Mutex<VecDeque<Result<Vec<u8>, ShellSyncFailure>>>,
    launched: Mutex<Vec<CommandSpec>>,
}

impl ScriptedLauncher {
    /// Creates a launcher with nothing queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an asynchronous launch.
    #[must_use]
    pub fn with_process(self, process: ScriptedProcess) -> Self {
        self.processes.lock().push_back(process);
        self
    }

    /// Queues the outcome of a blocking argv launch.
    #[must_use]
    pub fn with_sync(self, outcome: io::Result<SyncOutput>) -> Self {
        self.sync_outputs.lock().push_back(outcome);
        self
    }

    /// Queues the outcome of a blocking shell-string launch.
    #[must_use]
    pub fn with_shell_sync(self, outcome: Result<Vec<u8>, ShellSyncFailure>) -> Self {
        self.shell_outputs.lock().push_back(outcome);
        self
    }

    /// Every command launched so far, in order.
    #[must_use]
    pub fn launched(&self) -> Vec<CommandSpec> {
        self.launched.lock().clone()
    }

    fn record(&self, command: CommandSpec) {
        self.launched.lock().push(command);
    }
}

fn nothing_queued(command: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no scripted outcome for `{command}`"))
}

impl Launcher for ScriptedLauncher {
    fn spawn(&self, command: &CommandSpec, _options: &LaunchOptions) -> ProcessHandle {
        self.record(command.clone());
        match self.processes.lock().pop_front() {
            Some(process) => process.into_handle(),
            None => ProcessHandle::failed(nothing_queued(&command.display())),
        }
    }

    fn run_sync(&self, command: &CommandSpec, _options: &LaunchOptions) -> io::Result<SyncOutput> {
        self.record(command.clone());
        self.sync_outputs
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(nothing_queued(&command.display())))
    }

    fn run_shell_sync(
        &self,
        command: &str,
        _options: &LaunchOptions,
    ) -> Result<Vec<u8>, ShellSyncFailure> {
        self.record(CommandSpec::shell(command));
        self.shell_outputs
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ShellSyncFailure::start(nothing_queued(command))))
    }
}
