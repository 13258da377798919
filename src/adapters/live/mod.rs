//! Live adapters for real external interactions.

pub mod launcher;
pub mod sink;

pub use launcher::LiveLauncher;
pub use sink::TerminalSink;
