//! Application context - dependency injection container

use std::path::PathBuf;
use std::sync::Arc;

use retrylab_common::Clock;
use retrylab_core::{ArtifactStore, VerificationService};
use retrylab_domain::RetryPolicy;
use retrylab_infra::config::{artifact_dir, load_policy, resolve_policy_source, PolicySource};
use retrylab_infra::FsArtifactStore;
use tracing::info;

/// Application context - holds the effective policy and services
pub struct AppContext {
    pub policy: Arc<RetryPolicy>,
    pub policy_source: PolicySource,
    pub store: Arc<dyn ArtifactStore>,
    pub verification: Arc<VerificationService>,
}

impl AppContext {
    /// Build the context from the environment
    ///
    /// The policy comes from `RETRYLAB_POLICY_PATH` or the probed config
    /// files; artifacts land under `RETRYLAB_ARTIFACT_DIR`.
    pub fn new() -> Self {
        Self::with_settings(resolve_policy_source(), artifact_dir())
    }

    /// Build the context from an explicit policy source and artifact root
    pub fn with_settings(policy_source: PolicySource, artifact_root: PathBuf) -> Self {
        let policy = Arc::new(load_policy(&policy_source));
        info!(
            source = ?policy_source,
            artifact_root = %artifact_root.display(),
            max_retries = policy.max_retries,
            "Retry policy loaded"
        );

        let store: Arc<dyn ArtifactStore> = Arc::new(FsArtifactStore::new(artifact_root));
        Self::from_parts(policy, policy_source, store, None)
    }

    /// Assemble from already-built parts; `clock` defaults to the system clock
    pub fn from_parts(
        policy: Arc<RetryPolicy>,
        policy_source: PolicySource,
        store: Arc<dyn ArtifactStore>,
        clock: Option<Arc<dyn Clock>>,
    ) -> Self {
        let mut verification = VerificationService::new(Arc::clone(&policy), Arc::clone(&store));
        if let Some(clock) = clock {
            verification = verification.with_clock(clock);
        }

        Self { policy, policy_source, store, verification: Arc::new(verification) }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}
