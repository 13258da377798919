//! In-memory adapters for tests.

mod launcher;
mod sink;

pub use launcher::{chunked_reader, ScriptedExit, ScriptedLauncher, ScriptedProcess};
pub use sink::CapturingSink;
