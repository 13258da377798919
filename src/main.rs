//! Binary entrypoint for the `spawnbuf` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Logging verbosity comes from -v flags or RUST_LOG, set up in spawn_buffered::run.
    match spawn_buffered::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report();
            ExitCode::from(err.exit_code())
        }
    }
}
