//! Tracing subscriber setup for binaries
//!
//! Filtering follows `RUST_LOG` (default `info`). Output goes to stderr so
//! command output on stdout stays machine-readable.

use retrylab_domain::{Result, RetryLabError};
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format (`json` or `pretty`)
pub const LOG_FORMAT_ENV: &str = "RETRYLAB_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Format named by `RETRYLAB_LOG_FORMAT`, pretty when unset
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Install the global subscriber
///
/// # Errors
/// Returns `RetryLabError::Internal` if a global subscriber is already set.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Pretty => builder.with_target(false).try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    };

    installed.map_err(|e| RetryLabError::Internal(format!("Failed to initialise tracing: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Whichever test initialises first wins; the second call must error.
        let _ = init_tracing(LogFormat::Pretty);
        assert!(init_tracing(LogFormat::Json).is_err());
    }
}
