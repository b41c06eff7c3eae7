//! Built-in defaults and fixed artifact vocabulary

use std::time::Duration;

// Retry policy defaults
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(30_000);
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];
pub const DEFAULT_NON_RETRYABLE_STATUS_CODES: [u16; 4] = [400, 401, 403, 404];
pub const DEFAULT_NETWORK_ERROR_CODES: [&str; 4] =
    ["ETIMEDOUT", "ECONNRESET", "ECONNREFUSED", "ENOTFOUND"];
pub const DEFAULT_ALERT_THRESHOLD: u32 = 2;
pub const DEFAULT_LOG_RETRY_DETAILS: bool = true;

/// Upper bound accepted for `maxRetries` from configuration
pub const MAX_CONFIGURABLE_RETRIES: u32 = 100;

/// HTTP status that doubles the backoff delay
pub const RATE_LIMIT_STATUS: u16 = 429;
pub const RATE_LIMIT_MULTIPLIER: u64 = 2;

// Alert record vocabulary
pub const ALERT_LEVEL_ERROR: &str = "ERROR";
pub const ALERT_TYPE_RETRY_EXHAUSTED: &str = "RETRY_EXHAUSTED";

// Quality scoring
pub const QUALITY_CHECK_COUNT: usize = 5;
pub const QUALITY_PASS_SCORE: u8 = 80;

// Artifact key layout
pub const ALERTS_PREFIX: &str = "alerts";
pub const REPORTS_PREFIX: &str = "reports";
pub const TEST_REPORT_FILE: &str = "test-report.json";
pub const QUALITY_REPORT_FILE: &str = "quality-report.json";
