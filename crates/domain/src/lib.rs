//! # RetryLab Domain
//!
//! Data model shared by the retry engine and its verification harness.
//!
//! This crate contains:
//! - The retry policy and its built-in defaults
//! - Per-call execution records and results
//! - Scenario, report and alert artifacts (the persisted JSON shapes)
//! - Harness request/response types
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - Depends only on `retrylab-common` (foundation tier)
//! - No I/O, no async

pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
