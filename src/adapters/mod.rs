//! Adapters implementing the port traits.
//!
//! `live` talks to the real platform; `memory` provides in-process doubles
//! for deterministic tests.

pub mod live;
pub mod memory;
