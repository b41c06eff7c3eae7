//! # RetryLab Core
//!
//! Pure retry logic and verification harness - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Error classification, backoff calculation and the retry executor
//! - Port interfaces for alert and artifact persistence (traits)
//! - The scenario catalogue, runner, report generator and harness service
//!
//! ## Architecture Principles
//! - Only depends on `retrylab-common` and `retrylab-domain`
//! - No filesystem or network code
//! - Time and sleeping go through an injected `Clock`
//! - All persistence via traits

pub mod alert;
pub mod harness;
pub mod retry;
pub mod store;

// Re-export specific items to avoid ambiguity
pub use alert::ports::AlertSink;
pub use alert::sinks::{StoreAlertSink, TracingAlertSink};
pub use harness::report::ReportGenerator;
pub use harness::runner::ScenarioRunner;
pub use harness::scenarios::{builtin_catalogue, filter_catalogue};
pub use harness::service::VerificationService;
pub use retry::backoff::BackoffCalculator;
pub use retry::classifier::{ErrorClass, ErrorClassifier, RetryableFailure};
pub use retry::executor::RetryExecutor;
pub use store::memory::InMemoryArtifactStore;
pub use store::ports::ArtifactStore;
