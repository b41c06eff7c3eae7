//! Integration tests for the harness commands
//!
//! Commands run against an `AppContext` built from an in-memory store and a
//! virtual clock, or from a temporary artifact directory.

use std::sync::Arc;

use retrylab_api::{commands, AppContext};
use retrylab_common::MockClock;
use retrylab_core::InMemoryArtifactStore;
use retrylab_domain::{QualityStatus, RetryLabError, RetryPolicy, RunTestRequest};
use retrylab_infra::config::PolicySource;
use tempfile::TempDir;

fn in_memory_context() -> AppContext {
    AppContext::from_parts(
        Arc::new(RetryPolicy::default()),
        PolicySource::Defaults,
        Arc::new(InMemoryArtifactStore::new()),
        Some(Arc::new(MockClock::new())),
    )
}

/// A full run succeeds and its reports are retrievable by id.
#[tokio::test]
async fn test_run_then_fetch_reports() {
    let ctx = in_memory_context();

    let response = commands::run_test(
        &ctx,
        RunTestRequest { run_id: Some("run-cmd".to_string()), ..Default::default() },
    )
    .await;
    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "10/10 scenarios passed; quality PASS (score 100)");

    let report = commands::get_report(&ctx, "run-cmd").await.unwrap();
    assert_eq!(report.passed_scenarios, 10);

    let quality = commands::get_quality_report(&ctx, "run-cmd").await.unwrap();
    assert_eq!(quality.status, QualityStatus::Pass);

    assert_eq!(commands::list_runs(&ctx).await.unwrap(), vec!["run-cmd"]);
}

/// Missing reports surface as not-found errors.
#[tokio::test]
async fn test_missing_report_is_not_found() {
    let ctx = in_memory_context();

    let err = commands::get_report(&ctx, "run-absent").await.unwrap_err();
    assert!(matches!(err, RetryLabError::NotFound(_)));

    let err = commands::get_quality_report(&ctx, "run-absent").await.unwrap_err();
    assert!(matches!(err, RetryLabError::NotFound(_)));
}

/// Listing and policy commands reflect the context.
#[tokio::test]
async fn test_catalogue_and_policy() {
    let ctx = in_memory_context();

    assert_eq!(commands::list_scenarios(&ctx).len(), 10);
    assert_eq!(commands::get_policy(&ctx), RetryPolicy::default());
}

/// Settings-driven contexts load the policy source and write to the artifact
/// root.
#[tokio::test]
async fn test_context_from_settings() {
    let dir = TempDir::new().unwrap();
    let ctx = AppContext::with_settings(
        PolicySource::Json(r#"{"maxRetries": 4}"#.to_string()),
        dir.path().to_path_buf(),
    );

    assert_eq!(commands::get_policy(&ctx).max_retries, 4);
    assert!(commands::list_scenarios(&ctx)
        .iter()
        .filter(|s| s.expected_retries > 0)
        .all(|s| s.expected_retries == 3));
    assert!(commands::list_runs(&ctx).await.unwrap().is_empty());
}
