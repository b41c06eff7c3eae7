//! Retry exhaustion alert record

use std::time::Duration;

use chrono::{DateTime, Utc};
use retrylab_common::duration_millis;
use serde::{Deserialize, Serialize};

use super::execution::RetryRecord;
use crate::constants::{ALERT_LEVEL_ERROR, ALERT_TYPE_RETRY_EXHAUSTED};

/// One line of a run's alert log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryAlert {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub operation: String,
    pub error: String,
    pub retries: Vec<RetryRecord>,
    #[serde(with = "duration_millis")]
    pub total_duration: Duration,
}

impl RetryAlert {
    /// Alert for an operation that ran out of retries
    pub fn exhausted(
        timestamp: DateTime<Utc>,
        operation: impl Into<String>,
        error: impl Into<String>,
        retries: Vec<RetryRecord>,
        total_duration: Duration,
    ) -> Self {
        Self {
            timestamp,
            level: ALERT_LEVEL_ERROR.to_string(),
            alert_type: ALERT_TYPE_RETRY_EXHAUSTED.to_string(),
            operation: operation.into(),
            error: error.into(),
            retries,
            total_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates the alert line shape.
    ///
    /// Assertions:
    /// - Confirms level, type and duration keys.
    #[test]
    fn test_exhausted_alert_json() {
        let alert = RetryAlert::exhausted(
            Utc::now(),
            "fetch_profile",
            "Service Unavailable",
            Vec::new(),
            Duration::from_millis(7000),
        );
        let json = serde_json::to_value(&alert).unwrap();

        assert_eq!(json["level"], "ERROR");
        assert_eq!(json["type"], "RETRY_EXHAUSTED");
        assert_eq!(json["operation"], "fetch_profile");
        assert_eq!(json["totalDuration"], 7000);
    }
}
