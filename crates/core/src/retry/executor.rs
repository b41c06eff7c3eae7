//! The retry attempt loop
//!
//! `RetryExecutor` never returns an error of its own: every path produces an
//! [`ExecutionResult`] whose `success` flag callers branch on.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use retrylab_common::{log_handled_error, Clock, SystemClock};
use retrylab_domain::{ExecutionResult, RetryAlert, RetryPolicy, RetryRecord};

use super::backoff::BackoffCalculator;
use super::classifier::{ErrorClass, ErrorClassifier, RetryableFailure};
use super::tracing::{RetrySpan, RetryTracer};
use crate::alert::ports::AlertSink;
use crate::alert::sinks::TracingAlertSink;

/// Failure details captured before the error value is dropped
#[derive(Debug)]
struct ObservedFailure {
    message: String,
    status_code: Option<u16>,
    error_code: Option<String>,
    class: ErrorClass,
}

/// Runs an operation until it succeeds, fails terminally, or exhausts the
/// policy's retries
///
/// Holds only immutable configuration, so one executor can serve concurrent
/// calls.
#[derive(Clone)]
pub struct RetryExecutor {
    policy: Arc<RetryPolicy>,
    classifier: ErrorClassifier,
    backoff: BackoffCalculator,
    tracer: RetryTracer,
    clock: Arc<dyn Clock>,
    alerts: Arc<dyn AlertSink>,
}

impl RetryExecutor {
    /// Executor on the real clock that logs exhaustion alerts
    pub fn new(policy: Arc<RetryPolicy>) -> Self {
        Self {
            classifier: ErrorClassifier::new(Arc::clone(&policy)),
            backoff: BackoffCalculator::from_policy(&policy),
            tracer: RetryTracer::new(policy.log_retry_details),
            clock: Arc::new(SystemClock),
            alerts: Arc::new(TracingAlertSink),
            policy,
        }
    }

    /// Use `clock` for sleeping and for measuring durations
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Deliver exhaustion alerts to `sink`
    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alerts = sink;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    /// Invoke `operation` with retries
    ///
    /// Attempt `n` runs after `n` backoff waits. A retryable failure below the
    /// retry ceiling records its computed delay and sleeps; a terminal or
    /// final failure records a zero delay and ends the call. Only the
    /// exhausted path alerts.
    pub async fn execute_with_retry<F, Fut, T, E>(
        &self,
        mut operation: F,
        label: &str,
    ) -> ExecutionResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RetryableFailure,
    {
        let started = self.clock.now();
        let span = self.tracer.start_retry_span(label, self.policy.max_retries);
        let mut retries: Vec<RetryRecord> = Vec::new();
        let mut attempt: u32 = 0;

        loop {
            span.record_attempt(attempt);

            let failure = match operation().await {
                Ok(data) => {
                    let total_duration = self.elapsed_since(started);
                    span.record_success(attempt, total_duration);
                    return ExecutionResult {
                        success: true,
                        data: Some(data),
                        error: None,
                        retries,
                        total_duration,
                        final_attempt: attempt,
                    };
                }
                Err(err) => self.observe(&err),
            };

            span.record_failure(
                attempt,
                &failure.message,
                failure.status_code,
                failure.error_code.as_deref(),
                failure.class,
            );

            if !failure.class.should_retry() {
                retries.push(self.record(attempt, Duration::ZERO, &failure));
                span.record_aborted(attempt, &failure.message, failure.class);
                return self.failed(failure.message, retries, started, attempt);
            }

            if attempt >= self.policy.max_retries {
                retries.push(self.record(attempt, Duration::ZERO, &failure));
                let total_duration = self.elapsed_since(started);
                span.record_exhausted(&failure.message, total_duration);
                self.raise_alert(&span, &failure.message, &retries, total_duration).await;
                return self.failed(failure.message, retries, started, attempt);
            }

            let delay = self.backoff.delay(attempt, failure.status_code);
            retries.push(self.record(attempt, delay, &failure));
            self.check_threshold(&span, retries.len());

            span.record_backoff(attempt, delay);
            self.clock.sleep(delay).await;
            attempt += 1;
        }
    }

    fn observe<E: RetryableFailure>(&self, err: &E) -> ObservedFailure {
        ObservedFailure {
            message: err.to_string(),
            status_code: err.status_code(),
            error_code: err.error_code().map(str::to_string),
            class: self.classifier.classify(err),
        }
    }

    fn record(&self, attempt: u32, delay: Duration, failure: &ObservedFailure) -> RetryRecord {
        RetryRecord {
            attempt,
            timestamp: self.timestamp(),
            delay,
            error: failure.message.clone(),
            status_code: failure.status_code,
            error_code: failure.error_code.clone(),
        }
    }

    fn failed<T>(
        &self,
        message: String,
        retries: Vec<RetryRecord>,
        started: Instant,
        attempt: u32,
    ) -> ExecutionResult<T> {
        ExecutionResult {
            success: false,
            data: None,
            error: Some(message),
            retries,
            total_duration: self.elapsed_since(started),
            final_attempt: attempt,
        }
    }

    fn check_threshold(&self, span: &RetrySpan, recorded: usize) {
        let threshold = self.policy.alert_threshold;
        if threshold > 0 && recorded == threshold as usize {
            span.record_threshold_reached(recorded, threshold);
        }
    }

    async fn raise_alert(
        &self,
        span: &RetrySpan,
        message: &str,
        retries: &[RetryRecord],
        total_duration: Duration,
    ) {
        let alert = RetryAlert::exhausted(
            self.timestamp(),
            span.operation_name(),
            message,
            retries.to_vec(),
            total_duration,
        );

        if let Err(err) = self.alerts.write_alert(&alert).await {
            log_handled_error(&err, span.operation_name(), "Failed to persist retry alert");
        }
    }

    fn elapsed_since(&self, started: Instant) -> Duration {
        self.clock.now().saturating_duration_since(started)
    }

    fn timestamp(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.clock.system_time())
    }
}

impl std::fmt::Debug for RetryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryExecutor").field("policy", &self.policy).finish_non_exhaustive()
    }
}
