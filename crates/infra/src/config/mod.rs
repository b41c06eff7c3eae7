//! Retry policy configuration
//!
//! Loading is a pure function of a [`PolicySource`]; resolving which source
//! to use is the only step that looks at the environment.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    artifact_dir, load_policy, parse_policy, probe_policy_paths, resolve_policy_source,
    ConfigFormat, PolicySource, ARTIFACT_DIR_ENV, POLICY_PATH_ENV,
};
