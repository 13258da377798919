//! Buffered process launching.
//!
//! Launch a process, collect everything it writes to stdout and stderr, and
//! get back one immutable [`ProcessResult`] carrying both buffers and the exit
//! status. A non-zero status is not an error until asked for: call
//! [`ProcessResult::get_result`] for throw-on-failure semantics, or read the
//! fields directly.
//!
//! Four entry points cover argv and shell-string launches, each in an
//! asynchronous ([`spawn_buffered`], [`exec_buffered`]) and a blocking
//! ([`spawn_buffered_sync`], [`exec_buffered_sync`]) flavor. They use the live
//! launcher; build a [`Spawner`] to inject other adapters.

pub mod adapters;
pub mod assemble;
pub mod cli;
pub mod commands;
pub mod context;
pub mod drain;
pub mod encoding;
pub mod error;
pub mod exit;
pub mod format;
pub mod options;
pub mod pending;
pub mod ports;
pub mod result;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

pub use context::Spawner;
pub use encoding::{Encoding, ParseEncodingError};
pub use error::{Error, NonZeroExit};
pub use format::format_command;
pub use options::{DebugMirror, LaunchOptions, SpawnOptions};
pub use pending::PendingResult;
pub use ports::StreamKind;
pub use result::ProcessResult;

/// Launches `command` with `args` and captures its output asynchronously.
///
/// Must be called inside a tokio runtime.
pub fn spawn_buffered<I, S>(command: impl Into<String>, args: I, options: &SpawnOptions) -> PendingResult
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Spawner::live().spawn_buffered(command, args, options)
}

/// Launches `command` with `args` and blocks until it exits.
///
/// # Errors
///
/// Returns [`Error::Start`] if the process could not be started.
pub fn spawn_buffered_sync<I, S>(
    command: impl Into<String>,
    args: I,
    options: &SpawnOptions,
) -> Result<ProcessResult, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Spawner::live().spawn_buffered_sync(command, args, options)
}

/// Runs a shell string and captures its output asynchronously.
///
/// Must be called inside a tokio runtime.
pub fn exec_buffered(command: impl Into<String>, options: &SpawnOptions) -> PendingResult {
    Spawner::live().exec_buffered(command, options)
}

/// Runs a shell string and blocks until it exits.
///
/// When the command succeeds the result's stderr is empty.
///
/// # Errors
///
/// Returns [`Error::Start`] if the shell could not be started.
pub fn exec_buffered_sync(command: &str, options: &SpawnOptions) -> Result<ProcessResult, Error> {
    Spawner::live().exec_buffered_sync(command, options)
}

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns a [`commands::RunError`] when argument parsing or the launch fails.
pub fn run<I, T>(args: I) -> Result<(), commands::RunError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args)?;
    cli.validate()?;
    init_tracing(cli.verbose);
    commands::dispatch(&cli)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).try_init();
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_without_command() {
        let result = run(["spawnbuf"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_invalid_flag_value() {
        let err = run(["spawnbuf", "--timeout", "soon", "ls"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn run_passes_child_status_through() {
        let err = run(["spawnbuf", "--sync", "--", "sh", "-c", "exit 4"]).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
