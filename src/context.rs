//! Spawner bundling the launcher and output sink ports.

use std::sync::Arc;

use tracing::debug;

use crate::adapters::live::{LiveLauncher, TerminalSink};
use crate::assemble::{assemble, assemble_shell_sync, assemble_sync};
use crate::error::Error;
use crate::options::SpawnOptions;
use crate::pending::PendingResult;
use crate::ports::{CommandSpec, Launcher, OutputSink};
use crate::result::ProcessResult;

/// Entry points for buffered launches, wired to a launcher and a sink.
///
/// Constructors pick the adapters: [`Spawner::live`] for real processes and
/// the host terminal, [`Spawner::new`] for anything else (tests typically
/// pass a `ScriptedLauncher` and a `CapturingSink`).
#[derive(Clone)]
pub struct Spawner {
    launcher: Arc<dyn Launcher>,
    sink: Arc<dyn OutputSink>,
}

impl Spawner {
    /// Creates a spawner from explicit adapters.
    #[must_use]
    pub fn new(launcher: Arc<dyn Launcher>, sink: Arc<dyn OutputSink>) -> Self {
        Self { launcher, sink }
    }

    /// Creates a spawner that launches real processes and mirrors to this
    /// process's stdout and stderr.
    #[must_use]
    pub fn live() -> Self {
        Self::new(Arc::new(LiveLauncher), Arc::new(TerminalSink))
    }

    /// Launches `command` with `args` and captures its output without
    /// blocking.
    ///
    /// The process starts immediately; with the live launcher this must be
    /// called inside a tokio runtime.
    pub fn spawn_buffered<I, S>(
        &self,
        command: impl Into<String>,
        args: I,
        options: &SpawnOptions,
    ) -> PendingResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.launch(CommandSpec::argv(command, args), options)
    }

    /// Runs a shell string and captures its output without blocking.
    pub fn exec_buffered(&self, command: impl Into<String>, options: &SpawnOptions) -> PendingResult {
        self.launch(CommandSpec::shell(command), options)
    }

    /// Runs `command` with `args` to completion on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Start`] if the process could not be started.
    pub fn spawn_buffered_sync<I, S>(
        &self,
        command: impl Into<String>,
        args: I,
        options: &SpawnOptions,
    ) -> Result<ProcessResult, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = CommandSpec::argv(command, args);
        debug!(command = %command.display(), "launching (blocking)");
        assemble_sync(self.launcher.as_ref(), self.sink.as_ref(), command, options)
    }

    /// Runs a shell string to completion on the calling thread.
    ///
    /// On success the result's stderr is always empty; see
    /// [`assemble_shell_sync`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Start`] if the shell could not be started or the
    /// launch failed without a complete exit report.
    pub fn exec_buffered_sync(&self, command: &str, options: &SpawnOptions) -> Result<ProcessResult, Error> {
        debug!(command, "launching shell (blocking)");
        assemble_shell_sync(self.launcher.as_ref(), self.sink.as_ref(), command, options)
    }

    fn launch(&self, command: CommandSpec, options: &SpawnOptions) -> PendingResult {
        debug!(command = %command.display(), "launching");
        let handle = self.launcher.spawn(&command, &options.launch);
        let sink = Arc::clone(&self.sink);
        let debug = options.debug;
        PendingResult::new(async move { assemble(handle, command, sink.as_ref(), debug).await })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::adapters::memory::{CapturingSink, ScriptedLauncher, ScriptedProcess};
    use crate::encoding::Encoding;
    use crate::ports::{ShellSyncFailure, SyncOutput};

    fn spawner(launcher: ScriptedLauncher) -> (Spawner, Arc<ScriptedLauncher>, Arc<CapturingSink>) {
        let launcher = Arc::new(launcher);
        let sink = Arc::new(CapturingSink::new());
        let spawner = Spawner::new(launcher.clone(), sink.clone());
        (spawner, launcher, sink)
    }

    #[tokio::test]
    async fn spawn_buffered_launches_before_await() {
        let (spawner, launcher, _) =
            spawner(ScriptedLauncher::new().with_process(ScriptedProcess::exits(b"hello", b"world", 0)));

        let pending = spawner.spawn_buffered("node", ["child"], &SpawnOptions::default());
        assert_eq!(launcher.launched(), vec![CommandSpec::argv("node", ["child"])]);

        assert_eq!(pending.get_result_as(Encoding::Utf8).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn exec_buffered_mirrors_with_debug() {
        let (spawner, launcher, sink) =
            spawner(ScriptedLauncher::new().with_process(ScriptedProcess::exits(b"hello", b"world", 1)));

        let result = spawner.exec_buffered("node child", &SpawnOptions::with_debug(true)).await.unwrap();

        assert_eq!(launcher.launched(), vec![CommandSpec::shell("node child")]);
        assert_eq!(result.status(), Some(1));
        assert!(result.args().is_none());
        assert_eq!(sink.stdout(), b"hello");
        assert_eq!(sink.stderr(), b"world");
    }

    #[tokio::test]
    async fn start_failure_rejects_the_pending_result() {
        let (spawner, _, _) = spawner(
            ScriptedLauncher::new().with_process(ScriptedProcess::start_failure(io::ErrorKind::NotFound)),
        );
        let err = spawner.spawn_buffered("ghost", Vec::<String>::new(), &SpawnOptions::default()).await;
        assert_eq!(err.unwrap_err().kind(), "START_FAILURE");
    }

    #[test]
    fn sync_entry_points_use_blocking_launcher() {
        let (spawner, launcher, _) = spawner(
            ScriptedLauncher::new()
                .with_sync(Ok(SyncOutput { stdout: b"a".to_vec(), stderr: b"b".to_vec(), status: Some(0) }))
                .with_shell_sync(Err(ShellSyncFailure {
                    status: Some(7),
                    stdout: Some(b"c".to_vec()),
                    stderr: Some(b"d".to_vec()),
                    source: io::Error::other("failed"),
                })),
        );

        let argv = spawner.spawn_buffered_sync("prog", ["x y"], &SpawnOptions::default()).unwrap();
        assert_eq!(argv.get_result().unwrap(), b"a");

        let shell = spawner.exec_buffered_sync("prog 'x y'", &SpawnOptions::default()).unwrap();
        assert_eq!(shell.status(), Some(7));
        assert_eq!(shell.get_result().unwrap_err().to_string(), "prog 'x y' exited with code 7:\nd");

        assert_eq!(launcher.launched().len(), 2);
    }
}
