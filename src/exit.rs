//! Waiting for process termination.

use tracing::debug;

use crate::error::Error;
use crate::ports::{CommandSpec, ExitFuture};

/// Waits for `exit` and returns the exit code, or `None` when the process
/// was killed by a signal.
///
/// # Errors
///
/// Returns [`Error::Start`] if the process never started.
pub async fn watch_exit(exit: ExitFuture, command: &CommandSpec) -> Result<Option<i32>, Error> {
    let status =
        exit.await.map_err(|source| Error::Start { command: command.display(), source })?;
    debug!(command = %command.display(), ?status, "process exited");
    Ok(status)
}
