//! Retry engine: classification, backoff and the attempt loop

pub mod backoff;
pub mod classifier;
pub mod executor;
pub mod tracing;
