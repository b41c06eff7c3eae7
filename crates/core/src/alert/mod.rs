//! Retry exhaustion alerting

pub mod ports;
pub mod sinks;
