//! Drives the executor through scenarios and judges the outcome

use retrylab_domain::{ExecutionResult, ScenarioResult, TestScenario};
use tracing::{info, warn};

use crate::retry::executor::RetryExecutor;

/// Runs scenarios one at a time through a [`RetryExecutor`]
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    executor: RetryExecutor,
}

impl ScenarioRunner {
    pub fn new(executor: RetryExecutor) -> Self {
        Self { executor }
    }

    /// Run every scenario sequentially, in order
    pub async fn run(&self, scenarios: &[TestScenario]) -> Vec<ScenarioResult> {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(self.run_scenario(scenario).await);
        }
        results
    }

    pub async fn run_scenario(&self, scenario: &TestScenario) -> ScenarioResult {
        let injected = scenario.error.clone();
        let execution = self
            .executor
            .execute_with_retry(
                || {
                    let injected = injected.clone();
                    async move {
                        match injected {
                            Some(failure) => Err(failure),
                            None => Ok(()),
                        }
                    }
                },
                &scenario.name,
            )
            .await;

        let reason = evaluate(scenario, &execution);
        match &reason {
            None => {
                info!(scenario = %scenario.name, retries = execution.retry_count(), "Scenario passed");
            }
            Some(reason) => {
                warn!(scenario = %scenario.name, reason = %reason, "Scenario failed");
            }
        }

        ScenarioResult {
            scenario: scenario.clone(),
            success: execution.success,
            actual_retries: execution.retry_count(),
            duration: execution.total_duration,
            retries: execution.retries,
            passed: reason.is_none(),
            reason,
        }
    }
}

/// First violated expectation, checked in order: retry count, success flag,
/// backoff monotonicity
pub fn evaluate<T>(scenario: &TestScenario, execution: &ExecutionResult<T>) -> Option<String> {
    let actual_retries = execution.retry_count();
    if actual_retries != scenario.expected_retries {
        return Some(format!(
            "Expected {} retries, got {}",
            scenario.expected_retries, actual_retries
        ));
    }

    if execution.success != scenario.should_succeed {
        return Some(format!(
            "Expected success={}, got success={}",
            scenario.should_succeed, execution.success
        ));
    }

    let delays: Vec<_> =
        execution.retries.iter().filter(|r| r.is_backoff()).map(|r| r.delay).collect();
    if let Some(pair) = delays.windows(2).find(|pair| pair[1] < pair[0]) {
        return Some(format!(
            "Backoff delays decreased: {}ms then {}ms",
            pair[0].as_millis(),
            pair[1].as_millis()
        ));
    }

    None
}
