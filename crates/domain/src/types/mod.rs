//! Domain types and models
//!
//! Field names serialize in camelCase: these structs are the on-disk shape
//! of the policy file, alert log and report artifacts.

pub mod alert;
pub mod execution;
pub mod harness;
pub mod policy;
pub mod report;
pub mod scenario;

pub use alert::RetryAlert;
pub use execution::{ApiFailure, ExecutionResult, RetryRecord};
pub use harness::{RunTestRequest, RunTestResponse};
pub use policy::RetryPolicy;
pub use report::{QualityCheck, QualityReport, QualityStatus, ReportSummary, TestReport};
pub use scenario::{ScenarioKind, ScenarioResult, TestScenario};
