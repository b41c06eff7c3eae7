//! Test and quality report artifacts

use chrono::{DateTime, Utc};
use retrylab_common::impl_status_conversions;
use serde::{Deserialize, Serialize};

use super::scenario::ScenarioResult;

/// Aggregate of all scenario results for one verification run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub total_scenarios: usize,
    pub passed_scenarios: usize,
    pub failed_scenarios: usize,
    /// Retry ceiling of the policy the run used
    pub max_retries: u32,
    pub results: Vec<ScenarioResult>,
    pub summary: ReportSummary,
}

impl TestReport {
    pub fn all_passed(&self) -> bool {
        self.passed_scenarios == self.total_scenarios
    }
}

/// Behavioural checks derived from the scenario results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub retry_logic_working: bool,
    pub exponential_backoff_working: bool,
    pub error_classification_working: bool,
    pub max_retry_limit_working: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityStatus {
    Pass,
    Fail,
}

impl_status_conversions!(QualityStatus {
    Pass => "PASS",
    Fail => "FAIL",
});

/// One named quality check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheck {
    pub name: String,
    pub passed: bool,
    pub details: String,
}

/// Scored summary of a `TestReport`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub status: QualityStatus,
    /// Percentage of checks passed, 0-100
    pub score: u8,
    pub checks: Vec<QualityCheck>,
    pub recommendations: Vec<String>,
}

impl QualityReport {
    pub fn passed_checks(&self) -> usize {
        self.checks.iter().filter(|check| check.passed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates the quality status wire format.
    ///
    /// Assertions:
    /// - Confirms JSON and Display both use `PASS`/`FAIL`.
    /// - Confirms parsing accepts either case.
    #[test]
    fn test_quality_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&QualityStatus::Pass).unwrap(), "\"PASS\"");
        assert_eq!(
            serde_json::from_str::<QualityStatus>("\"FAIL\"").unwrap(),
            QualityStatus::Fail
        );
        assert_eq!(QualityStatus::Pass.to_string(), "PASS");
        assert_eq!(QualityStatus::Fail.to_string(), "FAIL");
        assert_eq!("pass".parse::<QualityStatus>().unwrap(), QualityStatus::Pass);
    }

    /// Validates summary key names.
    ///
    /// Assertions:
    /// - Confirms the four booleans serialize in camelCase.
    #[test]
    fn test_summary_json_keys() {
        let summary = ReportSummary {
            retry_logic_working: true,
            exponential_backoff_working: true,
            error_classification_working: false,
            max_retry_limit_working: true,
        };
        let json = serde_json::to_value(summary).unwrap();

        assert_eq!(json["retryLogicWorking"], true);
        assert_eq!(json["exponentialBackoffWorking"], true);
        assert_eq!(json["errorClassificationWorking"], false);
        assert_eq!(json["maxRetryLimitWorking"], true);
    }
}
