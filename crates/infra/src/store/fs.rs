//! Filesystem-backed artifact store
//!
//! Keys map to relative paths under a root directory; parent directories
//! are created on write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use retrylab_core::store::keys::validate_key;
use retrylab_core::ArtifactStore;
use retrylab_domain::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// [`ArtifactStore`] rooted at a directory
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |path, segment| path.join(segment)))
    }

    async fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        Self::ensure_parent(&path).await?;
        fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Artifact written");
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn append(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        Self::ensure_parent(&path).await?;

        let mut file = fs::OpenOptions::new().create(true).append(true).open(&path).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut pending = vec![(self.root.clone(), String::new())];

        while let Some((dir, key_prefix)) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                    continue;
                };
                let key = format!("{key_prefix}{name}");

                if entry.file_type().await?.is_dir() {
                    pending.push((entry.path(), format!("{key}/")));
                } else if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn locate(&self, key: &str) -> String {
        self.root.join(key).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(dir.path());

        store.write("reports/run-1/test-report.json", b"{\"ok\":true}").await.unwrap();

        let bytes = store.read("reports/run-1/test-report.json").await.unwrap();
        assert_eq!(bytes, Some(b"{\"ok\":true}".to_vec()));
        assert!(dir.path().join("reports").join("run-1").join("test-report.json").exists());
    }

    #[tokio::test]
    async fn test_read_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(dir.path());
        assert!(store.read("reports/nope/test-report.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_creates_and_extends() {
        let dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(dir.path());

        store.append("alerts/run-1.jsonl", b"{\"n\":1}\n").await.unwrap();
        store.append("alerts/run-1.jsonl", b"{\"n\":2}\n").await.unwrap();

        let text = String::from_utf8(store.read("alerts/run-1.jsonl").await.unwrap().unwrap())
            .unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["{\"n\":1}", "{\"n\":2}"]);
    }

    #[tokio::test]
    async fn test_list_walks_nested_keys() {
        let dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(dir.path());

        store.write("reports/run-b/test-report.json", b"1").await.unwrap();
        store.write("reports/run-a/test-report.json", b"1").await.unwrap();
        store.write("reports/run-a/quality-report.json", b"1").await.unwrap();
        store.append("alerts/run-a.jsonl", b"1").await.unwrap();

        assert_eq!(
            store.list("reports/").await.unwrap(),
            vec![
                "reports/run-a/quality-report.json",
                "reports/run-a/test-report.json",
                "reports/run-b/test-report.json",
            ]
        );
        assert_eq!(store.list("").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_list_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(dir.path().join("not-created"));
        assert!(store.list("reports/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(dir.path().join("root"));

        assert!(store.write("../outside.json", b"x").await.is_err());
        assert!(store.read("/etc/passwd").await.is_err());
        assert!(!dir.path().join("outside.json").exists());
    }
}
