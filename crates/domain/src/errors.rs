//! Error types used throughout the workspace

use retrylab_common::error::{CommonError, ErrorSeverity};
use retrylab_common::{impl_error_classification, impl_error_conversion};
use thiserror::Error;

/// Main error type for RetryLab
#[derive(Error, Debug)]
pub enum RetryLabError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl_error_conversion!(RetryLabError, Common);

impl_error_classification!(RetryLabError, Common,
    Self::Config(_) => {
        retryable: false,
        severity: ErrorSeverity::Error,
    },
    Self::Storage(_) => {
        retryable: true,
        severity: ErrorSeverity::Error,
    },
    Self::NotFound(_) => {
        retryable: false,
        severity: ErrorSeverity::Info,
    },
    Self::InvalidInput(_) => {
        retryable: false,
        severity: ErrorSeverity::Warning,
    },
    Self::Internal(_) => {
        retryable: false,
        severity: ErrorSeverity::Critical,
    }
);

/// Result type alias for RetryLab operations
pub type Result<T> = std::result::Result<T, RetryLabError>;
