//! # RetryLab Infrastructure
//!
//! Adapters behind the core ports plus process-level setup.
//!
//! This crate contains:
//! - Filesystem artifact store
//! - Retry policy configuration loading (JSON/TOML)
//! - Tracing subscriber initialisation
//!
//! ## Architecture
//! - Implements traits defined in `retrylab-core`
//! - Owns every filesystem and environment access

pub mod config;
pub mod observability;
pub mod store;

pub use config::{load_policy, resolve_policy_source, PolicySource};
pub use observability::{init_tracing, LogFormat};
pub use store::FsArtifactStore;
