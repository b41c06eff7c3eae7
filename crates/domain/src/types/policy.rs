//! Retry policy

use std::collections::BTreeSet;
use std::time::Duration;

use retrylab_common::duration_millis;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ALERT_THRESHOLD, DEFAULT_BASE_DELAY, DEFAULT_LOG_RETRY_DETAILS, DEFAULT_MAX_DELAY,
    DEFAULT_MAX_RETRIES, DEFAULT_NETWORK_ERROR_CODES, DEFAULT_NON_RETRYABLE_STATUS_CODES,
    DEFAULT_RETRYABLE_STATUS_CODES, MAX_CONFIGURABLE_RETRIES,
};
use crate::errors::{Result, RetryLabError};

/// Tunable parameters for the retry executor
///
/// Built once per executor and never mutated afterwards; share it behind an
/// `Arc` when several executors use the same settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry
    #[serde(with = "duration_millis")]
    pub base_delay: Duration,

    /// Ceiling applied to every computed delay
    #[serde(with = "duration_millis")]
    pub max_delay: Duration,

    pub retryable_status_codes: BTreeSet<u16>,

    pub non_retryable_status_codes: BTreeSet<u16>,

    /// Transport-level error codes (`ETIMEDOUT`, ...) that are always retried
    #[serde(rename = "networkErrors")]
    pub network_error_codes: BTreeSet<String>,

    /// Recorded retries at which an escalation warning is logged
    pub alert_threshold: u32,

    /// Emit per-attempt log events
    pub log_retry_details: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.into_iter().collect(),
            non_retryable_status_codes: DEFAULT_NON_RETRYABLE_STATUS_CODES.into_iter().collect(),
            network_error_codes: DEFAULT_NETWORK_ERROR_CODES
                .into_iter()
                .map(str::to_string)
                .collect(),
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            log_retry_details: DEFAULT_LOG_RETRY_DETAILS,
        }
    }
}

impl RetryPolicy {
    /// Check the invariants the executor relies on
    ///
    /// # Errors
    /// Returns `RetryLabError::Config` when `max_retries` exceeds the
    /// configurable ceiling, when `base_delay > max_delay`, or when a status
    /// code is listed as both retryable and non-retryable.
    pub fn validate(&self) -> Result<()> {
        if self.max_retries > MAX_CONFIGURABLE_RETRIES {
            return Err(RetryLabError::Config(format!(
                "maxRetries must be at most {}, got {}",
                MAX_CONFIGURABLE_RETRIES, self.max_retries
            )));
        }

        if self.base_delay > self.max_delay {
            return Err(RetryLabError::Config(format!(
                "baseDelay ({:?}) cannot be greater than maxDelay ({:?})",
                self.base_delay, self.max_delay
            )));
        }

        if let Some(code) =
            self.retryable_status_codes.intersection(&self.non_retryable_status_codes).next()
        {
            return Err(RetryLabError::Config(format!(
                "status {code} is listed as both retryable and non-retryable"
            )));
        }

        Ok(())
    }

    /// Upper bound on records in one execution: every attempt records at
    /// most once
    pub fn max_records(&self) -> usize {
        self.max_retries as usize + 1
    }
}
