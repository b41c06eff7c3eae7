//! Port interface for alert delivery

use async_trait::async_trait;
use retrylab_domain::{Result, RetryAlert};

/// Receives an alert when an execution exhausts its retries
///
/// The executor logs and discards any error returned here; a failing sink
/// never changes an `ExecutionResult`.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn write_alert(&self, alert: &RetryAlert) -> Result<()>;
}
