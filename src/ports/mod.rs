//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the capture engine and the
//! platform (process creation, host output). Implementations live in
//! `src/adapters/`.

pub mod launcher;
pub mod sink;

pub use launcher::{
    CommandSpec, ExitFuture, Launcher, OutputReader, ProcessHandle, ShellSyncFailure, SyncOutput,
};
pub use sink::{OutputSink, StreamKind};
