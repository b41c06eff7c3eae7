//! Artifact key layout

use retrylab_domain::constants::{
    ALERTS_PREFIX, QUALITY_REPORT_FILE, REPORTS_PREFIX, TEST_REPORT_FILE,
};
use retrylab_domain::{Result, RetryLabError};

/// `alerts/<run_id>.jsonl`
pub fn alert_log_key(run_id: &str) -> String {
    format!("{ALERTS_PREFIX}/{run_id}.jsonl")
}

/// `reports/<run_id>/test-report.json`
pub fn test_report_key(run_id: &str) -> String {
    format!("{REPORTS_PREFIX}/{run_id}/{TEST_REPORT_FILE}")
}

/// `reports/<run_id>/quality-report.json`
pub fn quality_report_key(run_id: &str) -> String {
    format!("{REPORTS_PREFIX}/{run_id}/{QUALITY_REPORT_FILE}")
}

/// Run ids that have a persisted test report, given keys under `reports/`
pub fn run_ids_from_keys(keys: &[String]) -> Vec<String> {
    let mut runs: Vec<String> = keys
        .iter()
        .filter_map(|key| {
            let rest = key.strip_prefix(REPORTS_PREFIX)?.strip_prefix('/')?;
            let (run_id, file) = rest.split_once('/')?;
            (file == TEST_REPORT_FILE).then(|| run_id.to_string())
        })
        .collect();
    runs.sort();
    runs.dedup();
    runs
}

/// Reject keys that could escape the store root
///
/// # Errors
/// Returns `RetryLabError::InvalidInput` for empty or absolute keys,
/// backslashes, and empty, `.` or `..` segments.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.starts_with('/') || key.contains('\\') {
        return Err(RetryLabError::InvalidInput(format!("invalid artifact key: {key:?}")));
    }

    if key.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
        return Err(RetryLabError::InvalidInput(format!("invalid artifact key: {key:?}")));
    }

    Ok(())
}

/// Check that a run id can be used as a single key segment
///
/// # Errors
/// Returns `RetryLabError::InvalidInput` when the id is empty, contains a
/// separator, or is a relative path component.
pub fn validate_run_id(run_id: &str) -> Result<()> {
    if run_id.contains('/') {
        return Err(RetryLabError::InvalidInput(format!("invalid run id: {run_id:?}")));
    }
    validate_key(run_id)
}
