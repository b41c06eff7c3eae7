//! Port interface for artifact persistence
//!
//! Keys are relative, `/`-separated paths such as
//! `reports/run-1/test-report.json`; adapters decide where they live.

use async_trait::async_trait;
use retrylab_domain::Result;

/// Storage for alert logs and report documents
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Create or replace the artifact at `key`
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Read the artifact at `key`, `None` when absent
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Append to the artifact at `key`, creating it if needed
    async fn append(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Keys starting with `prefix`, sorted
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Human-readable location of `key`, reported back to callers
    fn locate(&self, key: &str) -> String {
        key.to_string()
    }
}
