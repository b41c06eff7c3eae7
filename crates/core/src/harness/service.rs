//! Harness entry points
//!
//! `VerificationService` is what an outer surface (CLI, route handler) calls:
//! it runs scenario sweeps, persists their reports and reads them back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use retrylab_common::{log_handled_error, Clock, SystemClock};
use retrylab_domain::{
    QualityReport, QualityStatus, Result, RetryLabError, RetryPolicy, RunTestRequest,
    RunTestResponse, TestReport, TestScenario,
};
use serde::de::DeserializeOwned;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use super::report::ReportGenerator;
use super::runner::ScenarioRunner;
use super::scenarios::{builtin_catalogue, filter_catalogue};
use crate::alert::sinks::StoreAlertSink;
use crate::retry::executor::RetryExecutor;
use crate::store::keys::{quality_report_key, run_ids_from_keys, test_report_key, validate_run_id};
use crate::store::ports::ArtifactStore;

/// Outcome of one completed sweep
struct CompletedRun {
    report: TestReport,
    quality: QualityReport,
    location: String,
}

/// Runs verification sweeps and serves their reports
pub struct VerificationService {
    policy: Arc<RetryPolicy>,
    store: Arc<dyn ArtifactStore>,
    clock: Arc<dyn Clock>,
    catalogue: Vec<TestScenario>,
}

impl VerificationService {
    pub fn new(policy: Arc<RetryPolicy>, store: Arc<dyn ArtifactStore>) -> Self {
        Self { policy, store, clock: Arc::new(SystemClock), catalogue: builtin_catalogue() }
    }

    /// Use `clock` for every executor this service builds
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the scenario catalogue
    pub fn with_catalogue(mut self, catalogue: Vec<TestScenario>) -> Self {
        self.catalogue = catalogue;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run a verification sweep
    ///
    /// Never fails: a bad filter, an empty selection, or any report or
    /// persistence error comes back as `success: false` with a message.
    /// `success` is true only when the quality report passes.
    pub async fn run_test(&self, request: RunTestRequest) -> RunTestResponse {
        let run_id = request
            .run_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(generate_run_id, str::to_string);

        if let Err(err) = validate_run_id(&run_id) {
            warn!(run_id = %run_id, error = %err, "Rejected run id");
            return RunTestResponse::failed(run_id, err.to_string());
        }

        if request.credential_override.is_some() {
            info!(run_id = %run_id, "Credential override supplied; it is not persisted");
        }

        let scenarios = match request.scenario_type.as_deref() {
            Some(tag) => match filter_catalogue(&self.catalogue, tag) {
                Ok(selected) => selected,
                Err(err) => {
                    warn!(run_id = %run_id, scenario_type = %tag, "Unknown scenario type");
                    return RunTestResponse::failed(run_id, err.to_string());
                }
            },
            None => self.catalogue.clone(),
        };

        if scenarios.is_empty() {
            return RunTestResponse::failed(run_id, "No scenarios selected");
        }

        info!(run_id = %run_id, scenarios = scenarios.len(), "Starting verification run");

        match self.execute_run(&run_id, &scenarios).await {
            Ok(run) => {
                let passed = run.quality.status == QualityStatus::Pass;
                let message = format!(
                    "{}/{} scenarios passed; quality {} (score {})",
                    run.report.passed_scenarios,
                    run.report.total_scenarios,
                    run.quality.status,
                    run.quality.score
                );
                info!(run_id = %run_id, passed, message = %message, "Verification run finished");

                RunTestResponse {
                    success: passed,
                    run_id,
                    message,
                    report_path: Some(run.location),
                }
            }
            Err(err) => {
                let _run = info_span!("verification_run", run_id = %run_id).entered();
                log_handled_error(&err, "run_test", "Verification run failed");
                RunTestResponse::failed(run_id, format!("Verification run failed: {err}"))
            }
        }
    }

    /// Load the persisted test report of `run_id`
    ///
    /// # Errors
    /// Returns store and deserialization errors; a missing report is
    /// `Ok(None)`.
    pub async fn get_report(&self, run_id: &str) -> Result<Option<TestReport>> {
        validate_run_id(run_id)?;
        self.read_json(&test_report_key(run_id)).await
    }

    /// Load the persisted quality report of `run_id`
    ///
    /// # Errors
    /// Returns store and deserialization errors; a missing report is
    /// `Ok(None)`.
    pub async fn get_quality_report(&self, run_id: &str) -> Result<Option<QualityReport>> {
        validate_run_id(run_id)?;
        self.read_json(&quality_report_key(run_id)).await
    }

    pub fn list_scenarios(&self) -> Vec<TestScenario> {
        self.catalogue.clone()
    }

    /// Run ids with a persisted test report, sorted
    ///
    /// # Errors
    /// Returns any error from the artifact store.
    pub async fn list_runs(&self) -> Result<Vec<String>> {
        let keys = self.store.list("reports/").await?;
        Ok(run_ids_from_keys(&keys))
    }

    async fn execute_run(&self, run_id: &str, scenarios: &[TestScenario]) -> Result<CompletedRun> {
        let sink = Arc::new(StoreAlertSink::new(Arc::clone(&self.store), run_id));
        let executor = RetryExecutor::new(Arc::clone(&self.policy))
            .with_clock(Arc::clone(&self.clock))
            .with_alert_sink(sink);

        let results = ScenarioRunner::new(executor).run(scenarios).await;

        let now = self.now();
        let report =
            ReportGenerator::build_test_report(run_id, now, self.policy.max_retries, results);
        let quality = ReportGenerator::build_quality_report(&report, now);
        let location = ReportGenerator::new(Arc::clone(&self.store)).persist(&report, &quality).await?;

        Ok(CompletedRun { report, quality, location })
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.read(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|err| {
                RetryLabError::Storage(format!("corrupt artifact {key}: {err}"))
            }),
            None => Ok(None),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.clock.system_time())
    }
}

fn generate_run_id() -> String {
    format!("run-{}", Uuid::now_v7())
}

#[cfg(test)]
mod tests {
    use retrylab_common::MockClock;
    use retrylab_domain::{ApiFailure, ScenarioKind};

    use super::*;
    use crate::store::memory::InMemoryArtifactStore;

    fn service() -> (VerificationService, Arc<InMemoryArtifactStore>, MockClock) {
        let store = Arc::new(InMemoryArtifactStore::new());
        let clock = MockClock::new();
        let service = VerificationService::new(Arc::new(RetryPolicy::default()), store.clone())
            .with_clock(Arc::new(clock.clone()));
        (service, store, clock)
    }

    fn request(run_id: Option<&str>, scenario_type: Option<&str>) -> RunTestRequest {
        RunTestRequest {
            run_id: run_id.map(str::to_string),
            scenario_type: scenario_type.map(str::to_string),
            credential_override: None,
        }
    }

    /// Validates a full default sweep.
    ///
    /// Assertions:
    /// - Confirms success, the given run id and a report location.
    /// - Confirms the persisted report and a PASS quality report of 100.
    #[tokio::test]
    async fn test_full_sweep_passes() {
        let (service, _store, clock) = service();

        let response = service.run_test(request(Some("run-full"), None)).await;
        assert!(response.success, "{}", response.message);
        assert_eq!(response.message, "10/10 scenarios passed; quality PASS (score 100)");
        assert_eq!(response.run_id, "run-full");
        assert_eq!(
            response.report_path.as_deref(),
            Some("memory://reports/run-full/test-report.json")
        );

        let report = service.get_report("run-full").await.unwrap().unwrap();
        assert_eq!(report.total_scenarios, 10);
        assert_eq!(report.passed_scenarios, 10);

        let quality = service.get_quality_report("run-full").await.unwrap().unwrap();
        assert_eq!(quality.status, QualityStatus::Pass);
        assert_eq!(quality.score, 100);

        // 429: 2+4+8s, four server errors and the timeout: 1+2+4s each
        assert_eq!(clock.total_slept().as_millis(), 14_000 + 5 * 7_000);
    }

    /// Validates generated run ids.
    ///
    /// Assertions:
    /// - Confirms a blank id is replaced with a `run-` id.
    #[tokio::test]
    async fn test_generates_run_id() {
        let (service, _store, _clock) = service();
        let response = service.run_test(request(Some("  "), Some("client_error"))).await;

        assert!(response.success);
        assert!(response.run_id.starts_with("run-"));
        assert!(service.get_report(&response.run_id).await.unwrap().is_some());
    }

    /// Validates filter errors.
    ///
    /// Assertions:
    /// - Ensures unknown tags and empty selections fail without writing.
    #[tokio::test]
    async fn test_bad_filters_fail() {
        let (service, store, _clock) = service();

        let unknown = service.run_test(request(Some("r1"), Some("timeouts"))).await;
        assert!(!unknown.success);
        assert!(unknown.report_path.is_none());

        let empty = service.run_test(request(Some("r2"), Some("success"))).await;
        assert!(!empty.success);
        assert_eq!(empty.message, "No scenarios selected");

        assert!(store.is_empty().await);
    }

    /// Validates path-like run ids are rejected.
    ///
    /// Assertions:
    /// - Ensures `run_test` and `get_report` refuse traversal ids.
    #[tokio::test]
    async fn test_rejects_traversal_run_id() {
        let (service, store, _clock) = service();

        let response = service.run_test(request(Some("../escape"), None)).await;
        assert!(!response.success);
        assert!(service.get_report("../escape").await.is_err());
        assert!(store.is_empty().await);
    }

    /// Validates alert logs for exhausted scenarios.
    ///
    /// Assertions:
    /// - Confirms one alert line per exhausted scenario (6), none for client
    ///   errors.
    #[tokio::test]
    async fn test_alert_log_written() {
        let (service, store, _clock) = service();
        service.run_test(request(Some("run-alerts"), None)).await;

        let bytes = store.read("alerts/run-alerts.jsonl").await.unwrap().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 6);
    }

    /// Validates the credential override never reaches artifacts.
    ///
    /// Assertions:
    /// - Ensures no stored artifact contains the credential.
    #[tokio::test]
    async fn test_credential_not_persisted() {
        let (service, store, _clock) = service();
        let mut req = request(Some("run-cred"), None);
        req.credential_override = Some("sk-test-123".to_string());

        assert!(service.run_test(req).await.success);

        for key in store.list("").await.unwrap() {
            let bytes = store.read(&key).await.unwrap().unwrap();
            assert!(!String::from_utf8_lossy(&bytes).contains("sk-test-123"), "{key}");
        }
    }

    /// Validates a failing catalogue is reported as failure.
    ///
    /// Assertions:
    /// - Confirms a wrong expectation fails the run but still writes reports.
    #[tokio::test]
    async fn test_failing_catalogue() {
        let (service, _store, _clock) = service();
        let service = service.with_catalogue(vec![
            TestScenario::failing(
                ScenarioKind::ClientError,
                "client_error_404",
                "d",
                1,
                ApiFailure::http(404, "Not Found"),
            ),
            TestScenario::failing(
                ScenarioKind::ServerError,
                "server_error_500",
                "d",
                0,
                ApiFailure::http(500, "Internal Server Error"),
            ),
        ]);

        let response = service.run_test(request(Some("run-bad"), None)).await;
        assert!(!response.success);
        assert!(response.report_path.is_some());

        let quality = service.get_quality_report("run-bad").await.unwrap().unwrap();
        assert_eq!(quality.status, QualityStatus::Fail);
    }

    /// Validates the catalogue does not follow the policy's retry ceiling.
    ///
    /// Assertions:
    /// - Confirms retryable scenarios still expect 3 retries under
    ///   `max_retries: 5`.
    /// - Confirms the six retryable scenarios fail, leaving a score of 80
    ///   with only the all-scenarios recommendation.
    #[tokio::test]
    async fn test_raised_retry_ceiling_fails_retryable_scenarios() {
        let store = Arc::new(InMemoryArtifactStore::new());
        let policy = RetryPolicy { max_retries: 5, ..RetryPolicy::default() };
        let service = VerificationService::new(Arc::new(policy), store)
            .with_clock(Arc::new(MockClock::new()));

        assert!(service
            .list_scenarios()
            .iter()
            .filter(|s| s.kind != ScenarioKind::ClientError)
            .all(|s| s.expected_retries == 3));

        service.run_test(request(Some("run-ceiling"), None)).await;

        let report = service.get_report("run-ceiling").await.unwrap().unwrap();
        assert_eq!(report.passed_scenarios, 4);
        assert_eq!(report.failed_scenarios, 6);
        assert!(report
            .results
            .iter()
            .filter(|r| !r.passed)
            .all(|r| r.reason.as_deref() == Some("Expected 3 retries, got 5")));

        let quality = service.get_quality_report("run-ceiling").await.unwrap().unwrap();
        assert_eq!(quality.score, 80);
        assert_eq!(
            quality.recommendations,
            vec![crate::harness::report::ALL_SCENARIOS_RECOMMENDATION.to_string()]
        );
    }

    /// Validates listings.
    ///
    /// Assertions:
    /// - Confirms the catalogue listing and the persisted run ids.
    #[tokio::test]
    async fn test_listings() {
        let (service, _store, _clock) = service();
        assert_eq!(service.list_scenarios().len(), 10);
        assert!(service.list_runs().await.unwrap().is_empty());

        service.run_test(request(Some("run-b"), Some("network_error"))).await;
        service.run_test(request(Some("run-a"), Some("rate_limit"))).await;

        assert_eq!(service.list_runs().await.unwrap(), vec!["run-a", "run-b"]);
        assert!(service.get_report("run-missing").await.unwrap().is_none());
    }
}
