//! Common error types shared by every RetryLab crate
//!
//! 1. **`CommonError`**: the std-library failures every crate funnels through
//!    (JSON decoding and file I/O).
//! 2. **`ErrorClassification` trait**: asks an error whether repeating the
//!    failed operation can help and how severe it is.
//! 3. **`log_handled_error`**: logs an error that is swallowed instead of
//!    propagated, at the level its severity calls for.
//!
//! Crate-specific errors embed `CommonError` rather than duplicating it:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum StoreError {
//!     #[error("Invalid artifact key: {0}")]
//!     InvalidKey(String),
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//!
//! impl_error_classification!(StoreError, Common,
//!     Self::InvalidKey(_) => {
//!         retryable: false,
//!         severity: ErrorSeverity::Warning,
//!     }
//! );
//! ```

use thiserror::Error;

/// Failures shared across crates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// A document could not be encoded or decoded
    #[error("Serialization error ({format}): {message}")]
    Serialization { format: &'static str, message: String },

    /// Reading or writing an artifact failed
    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl CommonError {
    pub fn serialization<S: Into<String>>(format: &'static str, message: S) -> Self {
        Self::Serialization { format, message: message.into() }
    }

    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence { message: message.into() }
    }

    /// Stable label for the variant, suitable for log fields
    pub fn error_type_name(&self) -> &'static str {
        match self {
            Self::Serialization { .. } => "serialization",
            Self::Persistence { .. } => "persistence",
        }
    }
}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

/// Error classification shared by every error enum in the workspace
pub trait ErrorClassification {
    /// Whether repeating the failed operation can succeed
    fn is_retryable(&self) -> bool;

    /// How loudly the error is logged when it is handled locally
    fn severity(&self) -> ErrorSeverity;
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Expected condition, such as a missing report
    Info,
    /// Degraded input the caller can correct
    Warning,
    /// Failure requiring attention
    Error,
    /// Broken internal invariant
    Critical,
}

#[cfg(feature = "observability")]
impl ErrorSeverity {
    /// Tracing level used for handled errors of this severity
    pub fn level(self) -> tracing::Level {
        match self {
            Self::Info => tracing::Level::INFO,
            Self::Warning => tracing::Level::WARN,
            Self::Error | Self::Critical => tracing::Level::ERROR,
        }
    }
}

/// Log an error that is handled here rather than returned to the caller
///
/// The event level follows [`ErrorClassification::severity`].
#[cfg(feature = "observability")]
pub fn log_handled_error<E>(err: &E, operation: &str, message: &str)
where
    E: ErrorClassification + std::fmt::Display + ?Sized,
{
    let severity = err.severity();
    let retryable = err.is_retryable();
    let level = severity.level();

    if level == tracing::Level::INFO {
        tracing::info!(operation, retryable, severity = ?severity, error = %err, "{message}");
    } else if level == tracing::Level::WARN {
        tracing::warn!(operation, retryable, severity = ?severity, error = %err, "{message}");
    } else {
        tracing::error!(operation, retryable, severity = ?severity, error = %err, "{message}");
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("JSON", err.to_string())
    }
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        Self::persistence(err.to_string())
    }
}

/// Generates `From<serde_json::Error>` and `From<std::io::Error>` for an
/// error enum that embeds `CommonError` in the named variant
#[macro_export]
macro_rules! impl_error_conversion {
    ($error_type:ty, $variant:ident) => {
        impl From<serde_json::Error> for $error_type {
            fn from(err: serde_json::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }

        impl From<std::io::Error> for $error_type {
            fn from(err: std::io::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }
    };
}

/// Implements `ErrorClassification`, delegating the embedded `CommonError`
/// variant to its own implementation
#[macro_export]
macro_rules! impl_error_classification {
    (
        $error_type:ty,
        $common_variant:ident
        $(,
            $variant:pat => {
                retryable: $retryable:expr,
                severity: $severity:expr
                $(,)?
            }
        )*
        $(,)?
    ) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn is_retryable(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_retryable(e),
                    $(
                        $variant => $retryable,
                    )*
                }
            }

            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::severity(e),
                    $(
                        $variant => $severity,
                    )*
                }
            }
        }
    };
}
