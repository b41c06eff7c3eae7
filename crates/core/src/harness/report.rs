//! Test and quality report generation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use retrylab_domain::constants::{QUALITY_CHECK_COUNT, QUALITY_PASS_SCORE};
use retrylab_domain::{
    QualityCheck, QualityReport, QualityStatus, ReportSummary, Result, ScenarioResult, TestReport,
};
use tracing::info;

use crate::store::keys::{quality_report_key, test_report_key};
use crate::store::ports::ArtifactStore;

const RETRY_LOGIC_RECOMMENDATION: &str =
    "Retry logic is not retrying transient failures; check the retryable status and network code sets";
const BACKOFF_RECOMMENDATION: &str =
    "Backoff delays decreased between attempts; check the exponential backoff calculation";
const CLASSIFICATION_RECOMMENDATION: &str =
    "Client errors were retried; make sure 4xx statuses are classified as non-retryable";
const MAX_RETRY_RECOMMENDATION: &str =
    "Retries exceeded the configured ceiling; check the maxRetries enforcement";
pub(crate) const ALL_SCENARIOS_RECOMMENDATION: &str =
    "Some scenarios failed; review the per-scenario reasons in the test report";

/// Builds reports from scenario results and persists them
pub struct ReportGenerator {
    store: Arc<dyn ArtifactStore>,
}

impl ReportGenerator {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Aggregate scenario results into a `TestReport`
    pub fn build_test_report(
        run_id: &str,
        timestamp: DateTime<Utc>,
        max_retries: u32,
        results: Vec<ScenarioResult>,
    ) -> TestReport {
        let total_scenarios = results.len();
        let passed_scenarios = results.iter().filter(|r| r.passed).count();
        let summary = summarize(&results, max_retries);

        TestReport {
            run_id: run_id.to_string(),
            timestamp,
            total_scenarios,
            passed_scenarios,
            failed_scenarios: total_scenarios - passed_scenarios,
            max_retries,
            results,
            summary,
        }
    }

    /// Score a `TestReport` against the five quality checks
    pub fn build_quality_report(report: &TestReport, generated_at: DateTime<Utc>) -> QualityReport {
        let summary = &report.summary;
        let checks = vec![
            check(
                "Retry Logic",
                summary.retry_logic_working,
                "Retryable scenarios were retried",
                "A retryable scenario completed without retrying",
            ),
            check(
                "Exponential Backoff",
                summary.exponential_backoff_working,
                "Backoff delays never decreased",
                "A scenario recorded a decreasing backoff delay",
            ),
            check(
                "Error Classification",
                summary.error_classification_working,
                "Non-retryable scenarios were not retried",
                "A non-retryable scenario was retried",
            ),
            check(
                "Max Retry Limit",
                summary.max_retry_limit_working,
                "No scenario exceeded the retry ceiling",
                "A scenario exceeded the retry ceiling",
            ),
            QualityCheck {
                name: "All Scenarios Passed".to_string(),
                passed: report.all_passed(),
                details: format!(
                    "{}/{} scenarios passed",
                    report.passed_scenarios, report.total_scenarios
                ),
            },
        ];

        let recommendations = checks
            .iter()
            .zip(RECOMMENDATIONS)
            .filter(|(check, _)| !check.passed)
            .map(|(_, recommendation)| recommendation.to_string())
            .collect();

        let passed = checks.iter().filter(|c| c.passed).count();
        let score = score(passed, QUALITY_CHECK_COUNT);
        let status =
            if score >= QUALITY_PASS_SCORE { QualityStatus::Pass } else { QualityStatus::Fail };

        QualityReport {
            run_id: report.run_id.clone(),
            generated_at,
            status,
            score,
            checks,
            recommendations,
        }
    }

    /// Write both reports as pretty JSON and return the test report location
    ///
    /// # Errors
    /// Returns serialization errors and any error from the artifact store.
    pub async fn persist(&self, report: &TestReport, quality: &QualityReport) -> Result<String> {
        let test_key = test_report_key(&report.run_id);
        let quality_key = quality_report_key(&quality.run_id);

        self.store.write(&test_key, &serde_json::to_vec_pretty(report)?).await?;
        self.store.write(&quality_key, &serde_json::to_vec_pretty(quality)?).await?;

        info!(
            run_id = %report.run_id,
            status = %quality.status,
            score = quality.score,
            "Reports written"
        );
        Ok(self.store.locate(&test_key))
    }
}

const RECOMMENDATIONS: [&str; QUALITY_CHECK_COUNT] = [
    RETRY_LOGIC_RECOMMENDATION,
    BACKOFF_RECOMMENDATION,
    CLASSIFICATION_RECOMMENDATION,
    MAX_RETRY_RECOMMENDATION,
    ALL_SCENARIOS_RECOMMENDATION,
];

fn summarize(results: &[ScenarioResult], max_retries: u32) -> ReportSummary {
    let expecting_retries = || results.iter().filter(|r| r.scenario.expected_retries > 0);

    ReportSummary {
        retry_logic_working: expecting_retries().all(|r| r.actual_retries > 0),
        exponential_backoff_working: results.iter().all(ScenarioResult::backoff_non_decreasing),
        error_classification_working: results
            .iter()
            .filter(|r| r.scenario.expected_retries == 0)
            .all(|r| r.actual_retries == 0),
        max_retry_limit_working: expecting_retries().all(|r| r.actual_retries <= max_retries),
    }
}

fn check(name: &str, passed: bool, ok: &str, failed: &str) -> QualityCheck {
    QualityCheck {
        name: name.to_string(),
        passed,
        details: if passed { ok } else { failed }.to_string(),
    }
}

/// `round(100 * passed / total)`
fn score(passed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * passed + total) / (2 * total);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}
