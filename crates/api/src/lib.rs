//! # RetryLab API
//!
//! Application layer - harness commands and the CLI entry point.
//!
//! This crate contains:
//! - Commands wrapping the verification service (outer-surface bridge)
//! - Application context (dependency injection)
//! - The `retrylab` binary
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires infra adapters into core services

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
