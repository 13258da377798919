//! Command dispatch for the `spawnbuf` binary.

use std::io::{self, Write};

use tracing::debug;

use crate::cli::Cli;
use crate::context::Spawner;
use crate::error::Error;
use crate::format::format_command;
use crate::result::ProcessResult;

/// Failure of a `spawnbuf` invocation.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Invalid arguments, or a help/version request.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// The launch failed or the child exited with a non-zero status.
    #[error(transparent)]
    Launch(#[from] Error),

    /// The child was killed by a signal.
    #[error("{0} terminated by signal")]
    Signaled(String),

    /// The async runtime could not be created.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),

    /// Writing the captured output failed.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl RunError {
    /// Process exit code for this failure. A non-zero child status is
    /// passed through when it fits in a byte.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Usage(err) => u8::try_from(err.exit_code()).unwrap_or(2),
            RunError::Launch(err) => err
                .as_non_zero_exit()
                .and_then(|exit| u8::try_from(exit.status).ok())
                .filter(|code| *code != 0)
                .unwrap_or(1),
            RunError::Signaled(_) | RunError::Runtime(_) | RunError::Output(_) => 1,
        }
    }

    /// Prints the failure the way the user expects to see it.
    pub fn report(&self) {
        match self {
            RunError::Usage(err) => {
                let _ = err.print();
            }
            other => eprintln!("{other}"),
        }
    }
}

/// Runs the command described by `cli` and writes its stdout.
///
/// # Errors
///
/// Returns a [`RunError`] when the launch fails, the child exits non-zero
/// or is killed, or output cannot be written.
pub fn dispatch(cli: &Cli) -> Result<(), RunError> {
    let spawner = Spawner::live();
    let options = cli.spawn_options();
    debug!(?cli, "dispatching");

    let result = if cli.sync {
        if cli.shell {
            spawner.exec_buffered_sync(&cli.shell_line(), &options)?
        } else {
            spawner.spawn_buffered_sync(&cli.command[0], &cli.command[1..], &options)?
        }
    } else {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RunError::Runtime)?;
        runtime.block_on(async {
            if cli.shell {
                spawner.exec_buffered(cli.shell_line(), &options).await
            } else {
                spawner.spawn_buffered(&cli.command[0], &cli.command[1..], &options).await
            }
        })?
    };

    write_output(cli, &result, options.debug.stdout)
}

fn write_output(cli: &Cli, result: &ProcessResult, already_mirrored: bool) -> Result<(), RunError> {
    let stdout = result.get_result()?;
    if result.status().is_none() {
        return Err(RunError::Signaled(format_command(result.command(), result.args())));
    }
    if already_mirrored {
        return Ok(());
    }

    let mut out = io::stdout().lock();
    let written = match cli.encoding {
        Some(encoding) => out.write_all(encoding.decode(stdout).as_bytes()),
        None => out.write_all(stdout),
    };
    written.and_then(|()| out.flush()).map_err(RunError::Output)
}
