//! In-memory artifact store

use std::collections::BTreeMap;

use async_trait::async_trait;
use retrylab_domain::Result;
use tokio::sync::RwLock;

use super::keys::validate_key;
use super::ports::ArtifactStore;

/// Map-backed [`ArtifactStore`] for tests and dry runs
#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    artifacts: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts
    pub async fn len(&self) -> usize {
        self.artifacts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.artifacts.read().await.is_empty()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        validate_key(key)?;
        self.artifacts.write().await.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.artifacts.read().await.get(key).cloned())
    }

    async fn append(&self, key: &str, bytes: &[u8]) -> Result<()> {
        validate_key(key)?;
        self.artifacts.write().await.entry(key.to_string()).or_default().extend_from_slice(bytes);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let artifacts = self.artifacts.read().await;
        Ok(artifacts.keys().filter(|key| key.starts_with(prefix)).cloned().collect())
    }

    fn locate(&self, key: &str) -> String {
        format!("memory://{key}")
    }
}
