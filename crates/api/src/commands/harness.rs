//! Verification harness commands

use std::time::Instant;

use retrylab_domain::{
    QualityReport, Result, RetryLabError, RunTestRequest, RunTestResponse, TestReport,
    TestScenario,
};
use retrylab_common::log_handled_error;
use tracing::{info, info_span};

use crate::utils::logging::{error_label, log_command_execution};
use crate::AppContext;

/// Run a verification sweep and persist its reports
pub async fn run_test(ctx: &AppContext, request: RunTestRequest) -> RunTestResponse {
    let command_name = "harness::run_test";
    let start = Instant::now();

    info!(command = command_name, request = ?request, "Running verification");

    let response = ctx.verification.run_test(request).await;
    log_command_execution(command_name, start.elapsed(), response.success);

    response
}

/// Fetch the test report of a run
///
/// # Errors
/// Returns `RetryLabError::NotFound` when the run has no report.
pub async fn get_report(ctx: &AppContext, run_id: &str) -> Result<TestReport> {
    let command_name = "harness::get_report";
    let start = Instant::now();

    let result = ctx.verification.get_report(run_id).await.and_then(|report| {
        report.ok_or_else(|| RetryLabError::NotFound(format!("test report for {run_id}")))
    });
    log_result(command_name, start, &result);

    result
}

/// Fetch the quality report of a run
///
/// # Errors
/// Returns `RetryLabError::NotFound` when the run has no report.
pub async fn get_quality_report(ctx: &AppContext, run_id: &str) -> Result<QualityReport> {
    let command_name = "harness::get_quality_report";
    let start = Instant::now();

    let result = ctx.verification.get_quality_report(run_id).await.and_then(|report| {
        report.ok_or_else(|| RetryLabError::NotFound(format!("quality report for {run_id}")))
    });
    log_result(command_name, start, &result);

    result
}

/// The scenario catalogue a run would use
pub fn list_scenarios(ctx: &AppContext) -> Vec<TestScenario> {
    ctx.verification.list_scenarios()
}

/// Run ids with persisted reports
///
/// # Errors
/// Returns any error from the artifact store.
pub async fn list_runs(ctx: &AppContext) -> Result<Vec<String>> {
    let command_name = "harness::list_runs";
    let start = Instant::now();

    let result = ctx.verification.list_runs().await;
    log_result(command_name, start, &result);

    result
}

fn log_result<T>(command_name: &str, start: Instant, result: &Result<T>) {
    if let Err(err) = result {
        let _command = info_span!("command", error_type = error_label(err)).entered();
        log_handled_error(err, command_name, "Command failed");
    }
    log_command_execution(command_name, start.elapsed(), result.is_ok());
}
