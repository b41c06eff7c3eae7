//! Built-in scenario catalogue

use std::str::FromStr;

use retrylab_domain::constants::DEFAULT_MAX_RETRIES;
use retrylab_domain::{ApiFailure, Result, RetryLabError, ScenarioKind, TestScenario};

const SERVER_ERRORS: [(u16, &str, &str); 4] = [
    (500, "Internal Server Error", "Server fails with an unexpected internal error"),
    (502, "Bad Gateway", "Upstream gateway returns an invalid response"),
    (503, "Service Unavailable", "Service is temporarily overloaded or down"),
    (504, "Gateway Timeout", "Upstream gateway times out"),
];

const CLIENT_ERRORS: [(u16, &str, &str); 4] = [
    (400, "Bad Request", "Request is malformed"),
    (401, "Unauthorized", "Credentials are missing or invalid"),
    (403, "Forbidden", "Caller lacks permission"),
    (404, "Not Found", "Requested resource does not exist"),
];

/// The fixed ten-scenario catalogue
///
/// Retryable scenarios expect exactly the default ceiling of retries and
/// client errors expect none. The expectations do not follow the policy
/// under test, so a mis-set `maxRetries` fails the sweep.
pub fn builtin_catalogue() -> Vec<TestScenario> {
    let retries = DEFAULT_MAX_RETRIES;
    let mut scenarios = Vec::with_capacity(10);

    scenarios.push(TestScenario::failing(
        ScenarioKind::RateLimit,
        "rate_limit_429",
        "API rate limit exceeded; backoff doubles",
        retries,
        ApiFailure::http(429, "Too Many Requests"),
    ));

    scenarios.extend(SERVER_ERRORS.iter().map(|(status, message, description)| {
        TestScenario::failing(
            ScenarioKind::ServerError,
            format!("server_error_{status}"),
            *description,
            retries,
            ApiFailure::http(*status, *message),
        )
    }));

    scenarios.extend(CLIENT_ERRORS.iter().map(|(status, message, description)| {
        TestScenario::failing(
            ScenarioKind::ClientError,
            format!("client_error_{status}"),
            *description,
            0,
            ApiFailure::http(*status, *message),
        )
    }));

    scenarios.push(TestScenario::failing(
        ScenarioKind::NetworkError,
        "network_timeout",
        "Connection times out before a response arrives",
        retries,
        ApiFailure::network("ETIMEDOUT", "Request timeout"),
    ));

    scenarios
}

/// Restrict `scenarios` to one type tag
///
/// # Errors
/// Returns `RetryLabError::InvalidInput` when `tag` is not a scenario type.
pub fn filter_catalogue(scenarios: &[TestScenario], tag: &str) -> Result<Vec<TestScenario>> {
    let kind = ScenarioKind::from_str(tag).map_err(RetryLabError::InvalidInput)?;
    Ok(scenarios.iter().filter(|scenario| scenario.kind == kind).cloned().collect())
}
