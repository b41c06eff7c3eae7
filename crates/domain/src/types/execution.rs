//! Execution history and outcome types

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use retrylab_common::duration_millis;
use serde::{Deserialize, Serialize};

/// One failed attempt as observed by the executor
///
/// `delay` is the wait inserted after this attempt; the terminal record of a
/// failed execution carries a zero delay because no further wait occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryRecord {
    /// Zero-indexed attempt that failed
    pub attempt: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(with = "duration_millis")]
    pub delay: Duration,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl RetryRecord {
    /// Whether the executor waited after this attempt
    pub fn is_backoff(&self) -> bool {
        !self.delay.is_zero()
    }
}

/// Outcome of one `execute_with_retry` call
///
/// Built fresh per call and returned by value. A failed result always has
/// `error` set to the message of the last failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub retries: Vec<RetryRecord>,
    #[serde(with = "duration_millis")]
    pub total_duration: Duration,
    /// Index of the attempt that ended the execution
    pub final_attempt: u32,
}

impl<T> ExecutionResult<T> {
    /// Number of times the operation was re-invoked after its first attempt
    pub fn retry_count(&self) -> u32 {
        self.final_attempt
    }

    /// Delays actually waited, in attempt order
    pub fn backoff_delays(&self) -> Vec<Duration> {
        self.retries
            .iter()
            .filter(|record| record.attempt < self.final_attempt)
            .map(|record| record.delay)
            .collect()
    }
}

/// Failure raised by a wrapped API call
///
/// Carries an optional HTTP status and an optional transport error code
/// (`ETIMEDOUT`, `ECONNRESET`, ...). Either, both or neither may be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl ApiFailure {
    /// HTTP-level failure
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self { status: Some(status), code: None, message: message.into() }
    }

    /// Transport-level failure identified by an error code
    pub fn network(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { status: None, code: Some(code.into()), message: message.into() }
    }

    /// Failure with neither status nor code
    pub fn other(message: impl Into<String>) -> Self {
        Self { status: None, code: None, message: message.into() }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiFailure {}
