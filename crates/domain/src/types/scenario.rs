//! Verification scenarios and their verdicts

use std::time::Duration;

use retrylab_common::{duration_millis, impl_status_conversions};
use serde::{Deserialize, Serialize};

use super::execution::{ApiFailure, RetryRecord};

/// Failure family a scenario exercises
///
/// The string form doubles as the filter tag accepted by `run_test`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    RateLimit,
    ServerError,
    ClientError,
    NetworkError,
    /// Operation that succeeds first time; not part of the built-in catalogue
    Success,
}

impl_status_conversions!(ScenarioKind {
    RateLimit => "rate_limit",
    ServerError => "server_error",
    ClientError => "client_error",
    NetworkError => "network_error",
    Success => "success",
});

/// A synthetic failure (or success) case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestScenario {
    #[serde(rename = "type")]
    pub kind: ScenarioKind,
    pub name: String,
    pub description: String,
    pub expected_retries: u32,
    pub should_succeed: bool,
    /// Error the operation raises on every call; `None` means it succeeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiFailure>,
}

impl TestScenario {
    /// Scenario whose operation always fails with `error`
    pub fn failing(
        kind: ScenarioKind,
        name: impl Into<String>,
        description: impl Into<String>,
        expected_retries: u32,
        error: ApiFailure,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            expected_retries,
            should_succeed: false,
            error: Some(error),
        }
    }

    /// Scenario whose operation succeeds on the first call
    pub fn succeeding(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ScenarioKind::Success,
            name: name.into(),
            description: description.into(),
            expected_retries: 0,
            should_succeed: true,
            error: None,
        }
    }
}

/// Verdict for one scenario run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub scenario: TestScenario,
    pub success: bool,
    pub actual_retries: u32,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    pub retries: Vec<RetryRecord>,
    pub passed: bool,
    /// First violated expectation, when `passed` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScenarioResult {
    /// Non-zero delays in record order
    pub fn backoff_delays(&self) -> Vec<Duration> {
        self.retries.iter().filter(|r| r.is_backoff()).map(|r| r.delay).collect()
    }

    /// Whether the recorded backoff delays never decrease
    pub fn backoff_non_decreasing(&self) -> bool {
        self.backoff_delays().windows(2).all(|pair| pair[0] <= pair[1])
    }
}
