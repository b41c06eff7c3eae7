//! Harness entry point request/response types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parameters of one verification run
///
/// `credential_override` is accepted for callers that exercise a live API;
/// it never reaches an artifact and is redacted from `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTestRequest {
    #[serde(default)]
    pub run_id: Option<String>,
    /// Scenario type tag to restrict the sweep to
    #[serde(default)]
    pub scenario_type: Option<String>,
    #[serde(default, skip_serializing)]
    pub credential_override: Option<String>,
}

impl fmt::Debug for RunTestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunTestRequest")
            .field("run_id", &self.run_id)
            .field("scenario_type", &self.scenario_type)
            .field("credential_override", &self.credential_override.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTestResponse {
    pub success: bool,
    pub run_id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
}

impl RunTestResponse {
    pub fn failed(run_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self { success: false, run_id: run_id.into(), message: message.into(), report_path: None }
    }
}
