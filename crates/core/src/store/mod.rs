//! Artifact persistence: port, key layout and the in-memory adapter

pub mod keys;
pub mod memory;
pub mod ports;
