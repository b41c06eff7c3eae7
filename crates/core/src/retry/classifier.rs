//! Failure classification against a retry policy

use std::fmt;
use std::sync::Arc;

use retrylab_domain::{ApiFailure, RetryPolicy};
use serde::{Deserialize, Serialize};

/// Error shape the executor understands
///
/// Implemented by the error type of any operation passed to
/// [`RetryExecutor`](super::executor::RetryExecutor). `Display` supplies the
/// message recorded in the retry history.
pub trait RetryableFailure: fmt::Display {
    /// HTTP status carried by the failure, if any
    fn status_code(&self) -> Option<u16>;

    /// Transport error code (`ETIMEDOUT`, `ECONNRESET`, ...), if any
    fn error_code(&self) -> Option<&str>;
}

impl RetryableFailure for ApiFailure {
    fn status_code(&self) -> Option<u16> {
        self.status
    }

    fn error_code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

/// Classification verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Retryable,
    NonRetryable,
    /// Neither status nor code is recognised by the policy
    Unknown,
}

impl ErrorClass {
    /// Only `Retryable` failures earn another attempt; unknown errors fail
    /// closed.
    pub fn should_retry(self) -> bool {
        matches!(self, Self::Retryable)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Retryable => "retryable",
            Self::NonRetryable => "non_retryable",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Pure function of (failure, policy)
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    policy: Arc<RetryPolicy>,
}

impl ErrorClassifier {
    pub fn new(policy: Arc<RetryPolicy>) -> Self {
        Self { policy }
    }

    /// Classify a failure
    ///
    /// A recognised network code wins over any status. A status in the
    /// retryable set is retryable; every other status is terminal.
    pub fn classify(&self, failure: &dyn RetryableFailure) -> ErrorClass {
        self.classify_parts(failure.status_code(), failure.error_code())
    }

    /// Classify from the raw status/code pair
    pub fn classify_parts(&self, status_code: Option<u16>, error_code: Option<&str>) -> ErrorClass {
        if error_code.is_some_and(|code| self.policy.network_error_codes.contains(code)) {
            return ErrorClass::Retryable;
        }

        match status_code {
            Some(status) if self.policy.retryable_status_codes.contains(&status) => {
                ErrorClass::Retryable
            }
            Some(_) => ErrorClass::NonRetryable,
            None => ErrorClass::Unknown,
        }
    }
}
