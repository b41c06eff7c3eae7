//! Alert sink adapters

use std::sync::Arc;

use async_trait::async_trait;
use retrylab_domain::{Result, RetryAlert};
use tracing::{debug, error};

use super::ports::AlertSink;
use crate::store::keys::alert_log_key;
use crate::store::ports::ArtifactStore;

/// Appends each alert as one JSON line to `alerts/<run_id>.jsonl`
pub struct StoreAlertSink {
    store: Arc<dyn ArtifactStore>,
    run_id: String,
}

impl StoreAlertSink {
    pub fn new(store: Arc<dyn ArtifactStore>, run_id: impl Into<String>) -> Self {
        Self { store, run_id: run_id.into() }
    }

    fn key(&self) -> String {
        alert_log_key(&self.run_id)
    }
}

#[async_trait]
impl AlertSink for StoreAlertSink {
    async fn write_alert(&self, alert: &RetryAlert) -> Result<()> {
        let mut line = serde_json::to_vec(alert)?;
        line.push(b'\n');

        let key = self.key();
        self.store.append(&key, &line).await?;
        debug!(run_id = %self.run_id, key = %key, operation = %alert.operation, "Alert recorded");
        Ok(())
    }
}

/// Sink that only logs; used when no store is wired
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAlertSink;

#[async_trait]
impl AlertSink for TracingAlertSink {
    async fn write_alert(&self, alert: &RetryAlert) -> Result<()> {
        error!(
            level = %alert.level,
            alert_type = %alert.alert_type,
            operation = %alert.operation,
            error = %alert.error,
            retries = alert.retries.len(),
            total_duration_ms = alert.total_duration.as_millis() as u64,
            "Retry alert"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::*;
    use crate::store::memory::InMemoryArtifactStore;

    fn alert(operation: &str) -> RetryAlert {
        RetryAlert::exhausted(
            Utc::now(),
            operation,
            "Service Unavailable",
            Vec::new(),
            Duration::from_millis(7000),
        )
    }

    /// Validates alerts are appended as JSON lines.
    ///
    /// Assertions:
    /// - Confirms two alerts produce two parseable lines under the run key.
    #[tokio::test]
    async fn test_store_sink_appends_json_lines() {
        let store = Arc::new(InMemoryArtifactStore::new());
        let sink = StoreAlertSink::new(store.clone(), "run-1");

        sink.write_alert(&alert("first")).await.unwrap();
        sink.write_alert(&alert("second")).await.unwrap();

        let bytes = store.read("alerts/run-1.jsonl").await.unwrap().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<RetryAlert> =
            text.lines().map(|line| serde_json::from_str(line).unwrap()).collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].operation, "first");
        assert_eq!(lines[1].alert_type, "RETRY_EXHAUSTED");
    }

    /// Validates persistence errors surface from the sink.
    ///
    /// Assertions:
    /// - Ensures an invalid run id yields an error instead of a write.
    #[tokio::test]
    async fn test_store_sink_reports_invalid_key() {
        let store = Arc::new(InMemoryArtifactStore::new());
        let sink = StoreAlertSink::new(store.clone(), "../evil");

        assert!(sink.write_alert(&alert("op")).await.is_err());
        assert!(store.is_empty().await);
    }

    /// Validates the logging sink.
    ///
    /// Assertions:
    /// - Confirms it always succeeds.
    #[tokio::test]
    async fn test_tracing_sink() {
        assert!(TracingAlertSink.write_alert(&alert("op")).await.is_ok());
    }
}
