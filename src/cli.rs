//! CLI argument definitions.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};

use crate::encoding::Encoding;
use crate::options::{DebugMirror, LaunchOptions, SpawnOptions};

/// Top-level CLI parser for `spawnbuf`.
#[derive(Debug, Parser)]
#[command(name = "spawnbuf", version, about = "Run a command and report its buffered output")]
pub struct Cli {
    /// Interpret the command through the platform shell.
    #[arg(long)]
    pub shell: bool,

    /// Use the blocking launcher instead of the asynchronous one.
    #[arg(long)]
    pub sync: bool,

    /// Mirror child output to this terminal while capturing.
    #[arg(
        long,
        value_enum,
        num_args = 0..=1,
        default_missing_value = "both",
        env = "SPAWNBUF_DEBUG"
    )]
    pub debug: Option<DebugTarget>,

    /// Working directory for the child.
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Kill the child after this many milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Decode stdout with this encoding instead of writing raw bytes.
    ///
    /// Not allowed while `--debug` mirrors stdout.
    #[arg(long)]
    pub encoding: Option<Encoding>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Program and arguments, or the shell string with `--shell`.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Streams selected by `--debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DebugTarget {
    /// Mirror stdout only.
    Stdout,
    /// Mirror stderr only.
    Stderr,
    /// Mirror both streams.
    #[value(alias = "1", alias = "true")]
    Both,
    /// Mirror nothing.
    #[value(alias = "0", alias = "false")]
    Off,
}

impl From<DebugTarget> for DebugMirror {
    fn from(target: DebugTarget) -> Self {
        match target {
            DebugTarget::Stdout => DebugMirror { stdout: true, stderr: false },
            DebugTarget::Stderr => DebugMirror { stdout: false, stderr: true },
            DebugTarget::Both => DebugMirror::BOTH,
            DebugTarget::Off => DebugMirror::NONE,
        }
    }
}

impl Cli {
    /// Builds the launch options described by the flags.
    #[must_use]
    pub fn spawn_options(&self) -> SpawnOptions {
        SpawnOptions {
            launch: LaunchOptions {
                cwd: self.cwd.clone(),
                timeout_ms: self.timeout,
                ..LaunchOptions::default()
            },
            debug: self.debug.map(DebugMirror::from).unwrap_or_default(),
        }
    }

    /// Rejects flag combinations clap cannot express on its own.
    ///
    /// # Errors
    ///
    /// Returns an argument-conflict error when `--encoding` is combined with
    /// a `--debug` target that mirrors stdout, since mirrored stdout is not
    /// printed a second time.
    pub fn validate(&self) -> Result<(), clap::Error> {
        if self.encoding.is_some() && self.spawn_options().debug.stdout {
            return Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                "--encoding cannot be used while --debug mirrors stdout",
            ));
        }
        Ok(())
    }

    /// The shell string for `--shell` launches.
    #[must_use]
    pub fn shell_line(&self) -> String {
        self.command.join(" ")
    }
}
