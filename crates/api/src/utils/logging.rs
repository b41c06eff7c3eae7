use std::time::Duration;

use retrylab_domain::RetryLabError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a stable identifier such as `"harness::run_test"`; callers
/// must not forward sensitive values in it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `RetryLabError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &RetryLabError) -> &'static str {
    match error {
        RetryLabError::Config(_) => "config",
        RetryLabError::Storage(_) => "storage",
        RetryLabError::NotFound(_) => "not_found",
        RetryLabError::InvalidInput(_) => "invalid_input",
        RetryLabError::Internal(_) => "internal",
        RetryLabError::Common(common) => common.error_type_name(),
    }
}
