//! Structured log events for retry executions
//!
//! Per-attempt events are gated by `RetryPolicy::log_retry_details`; the
//! terminal outcome of an execution is always logged.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::classifier::ErrorClass;

/// Opens a [`RetrySpan`] per execution
#[derive(Debug, Clone, Copy)]
pub struct RetryTracer {
    log_details: bool,
}

impl RetryTracer {
    pub fn new(log_details: bool) -> Self {
        Self { log_details }
    }

    /// Start tracking one `execute_with_retry` call
    pub fn start_retry_span(&self, operation_name: &str, max_retries: u32) -> RetrySpan {
        if self.log_details {
            debug!(operation = operation_name, max_retries, "Starting retry operation");
        }

        RetrySpan {
            operation_name: operation_name.to_string(),
            max_retries,
            log_details: self.log_details,
        }
    }
}

impl Default for RetryTracer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Log context for a single execution
#[derive(Debug)]
pub struct RetrySpan {
    operation_name: String,
    max_retries: u32,
    log_details: bool,
}

impl RetrySpan {
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// Record an attempt being started
    pub fn record_attempt(&self, attempt: u32) {
        if self.log_details {
            debug!(operation = %self.operation_name, attempt, "Executing attempt");
        }
    }

    /// Record a failed attempt and how it was classified
    pub fn record_failure(
        &self,
        attempt: u32,
        error: &str,
        status_code: Option<u16>,
        error_code: Option<&str>,
        class: ErrorClass,
    ) {
        if self.log_details {
            warn!(
                operation = %self.operation_name,
                attempt,
                error = %error,
                status_code = ?status_code,
                error_code = ?error_code,
                classification = %class,
                "Attempt failed"
            );
        }
    }

    /// Record the wait before the next attempt
    pub fn record_backoff(&self, attempt: u32, delay: Duration) {
        if self.log_details {
            info!(
                operation = %self.operation_name,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Retrying after backoff"
            );
        }
    }

    /// Record a successful attempt
    pub fn record_success(&self, attempt: u32, total_duration: Duration) {
        if self.log_details {
            info!(
                operation = %self.operation_name,
                retries = attempt,
                total_duration_ms = total_duration.as_millis() as u64,
                "Operation succeeded"
            );
        }
    }

    /// Record that the recorded retries reached the alert threshold
    pub fn record_threshold_reached(&self, retries: usize, threshold: u32) {
        warn!(
            operation = %self.operation_name,
            retries,
            threshold,
            "Retry count reached alert threshold"
        );
    }

    /// Record that all retries have been used up
    pub fn record_exhausted(&self, error: &str, total_duration: Duration) {
        error!(
            operation = %self.operation_name,
            max_retries = self.max_retries,
            error = %error,
            total_duration_ms = total_duration.as_millis() as u64,
            "All retry attempts exhausted"
        );
    }

    /// Record an abort on a failure that must not be retried
    pub fn record_aborted(&self, attempt: u32, error: &str, class: ErrorClass) {
        warn!(
            operation = %self.operation_name,
            attempt,
            error = %error,
            classification = %class,
            "Not retrying failure"
        );
    }
}
