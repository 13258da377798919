//! Turning a launch into a [`ProcessResult`].
//!
//! The asynchronous path drains both output channels and waits for exit
//! concurrently; the first failure among the three ends the assembly and
//! the others are dropped. The blocking paths make one launcher call and
//! interpret what comes back.

use tracing::{debug, warn};

use crate::drain::drain;
use crate::error::Error;
use crate::exit::watch_exit;
use crate::options::{DebugMirror, SpawnOptions};
use crate::ports::{CommandSpec, Launcher, OutputSink, ProcessHandle, ShellSyncFailure, StreamKind};
use crate::result::ProcessResult;

/// Collects stdout, stderr and the exit status of a launched process.
///
/// # Errors
///
/// Returns the first of [`Error::Stream`] or [`Error::Start`] raised while
/// draining or waiting.
pub async fn assemble(
    handle: ProcessHandle,
    command: CommandSpec,
    sink: &dyn OutputSink,
    debug: DebugMirror,
) -> Result<ProcessResult, Error> {
    let ProcessHandle { stdout, stderr, exit } = handle;
    let (stdout, stderr, status) = tokio::try_join!(
        drain(stdout, StreamKind::Stdout, debug.stdout.then_some(sink)),
        drain(stderr, StreamKind::Stderr, debug.stderr.then_some(sink)),
        watch_exit(exit, &command),
    )?;

    let (command, args) = command.into_parts();
    Ok(ProcessResult::new(command, args, stdout, stderr, status))
}

/// Runs an argv command through the blocking launcher.
///
/// # Errors
///
/// Returns [`Error::Start`] if the process could not be started.
pub fn assemble_sync(
    launcher: &dyn Launcher,
    sink: &dyn OutputSink,
    command: CommandSpec,
    options: &SpawnOptions,
) -> Result<ProcessResult, Error> {
    let output = launcher
        .run_sync(&command, &options.launch)
        .map_err(|source| Error::Start { command: command.display(), source })?;
    debug!(command = %command.display(), status = ?output.status, "process exited");
    mirror_buffers(sink, options.debug, &output.stdout, &output.stderr);

    let (command, args) = command.into_parts();
    Ok(ProcessResult::new(command, args, output.stdout, output.stderr, output.status))
}

/// Runs a shell string through the blocking launcher.
///
/// A successful run yields status 0 and an empty stderr: the blocking shell
/// launch does not hand back stderr when the command succeeds. A reported
/// non-zero exit that carries status, stdout and stderr becomes a normal
/// result.
///
/// # Errors
///
/// Returns [`Error::Start`] when the launcher fails without a complete
/// exit report.
pub fn assemble_shell_sync(
    launcher: &dyn Launcher,
    sink: &dyn OutputSink,
    command: &str,
    options: &SpawnOptions,
) -> Result<ProcessResult, Error> {
    match launcher.run_shell_sync(command, &options.launch) {
        Ok(stdout) => {
            debug!(command, "process exited with status 0");
            mirror_buffers(sink, options.debug, &stdout, &[]);
            Ok(ProcessResult::new(command, None, stdout, Vec::new(), Some(0)))
        }
        Err(ShellSyncFailure { status: Some(status), stdout: Some(stdout), stderr: Some(stderr), .. })
            if status != 0 =>
        {
            debug!(command, status, "process exited");
            mirror_buffers(sink, options.debug, &stdout, &stderr);
            Ok(ProcessResult::new(command, None, stdout, stderr, Some(status)))
        }
        Err(failure) => Err(Error::Start { command: command.to_string(), source: failure.source }),
    }
}

fn mirror_buffers(sink: &dyn OutputSink, debug: DebugMirror, stdout: &[u8], stderr: &[u8]) {
    let streams = [(debug.stdout, StreamKind::Stdout, stdout), (debug.stderr, StreamKind::Stderr, stderr)];
    for (enabled, stream, bytes) in streams {
        if !enabled || bytes.is_empty() {
            continue;
        }
        if let Err(err) = sink.write(stream, bytes) {
            warn!(%stream, error = %err, "debug mirror write failed");
        }
    }
}
