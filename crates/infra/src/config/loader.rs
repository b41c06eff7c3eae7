//! Policy configuration loader
//!
//! ## Loading Strategy
//! 1. `RETRYLAB_POLICY_PATH` names the policy file when set
//! 2. Otherwise the loader probes the standard locations
//! 3. No file means built-in defaults
//! 4. JSON and TOML are supported (detected by file extension)
//!
//! Documents may be partial: present keys override the defaults one field at
//! a time. An unreadable, malformed or invalid document never fails the
//! caller; it falls back to the defaults with a debug log.
//!
//! ## File Locations
//! Probed in order, relative to the working directory:
//! 1. `./retry-config.json`
//! 2. `./retry-config.toml`
//! 3. `./config/retry-config.json`

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use retrylab_domain::{Result, RetryLabError, RetryPolicy};
use serde::Deserialize;

/// Environment variable naming the policy file
pub const POLICY_PATH_ENV: &str = "RETRYLAB_POLICY_PATH";

/// Environment variable naming the artifact root directory
pub const ARTIFACT_DIR_ENV: &str = "RETRYLAB_ARTIFACT_DIR";

const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

const PROBE_PATHS: [&str; 3] =
    ["retry-config.json", "retry-config.toml", "config/retry-config.json"];

/// Where a policy comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicySource {
    Defaults,
    Json(String),
    Toml(String),
    File(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format implied by a file extension; files without one are JSON
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            None | Some("json") => Some(Self::Json),
            Some("toml") => Some(Self::Toml),
            Some(_) => None,
        }
    }
}

/// Partial policy document
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolicyOverrides {
    max_retries: Option<u32>,
    base_delay: Option<u64>,
    max_delay: Option<u64>,
    retryable_status_codes: Option<BTreeSet<u16>>,
    non_retryable_status_codes: Option<BTreeSet<u16>>,
    #[serde(rename = "networkErrors")]
    network_error_codes: Option<BTreeSet<String>>,
    alert_threshold: Option<u32>,
    log_retry_details: Option<bool>,
}

impl PolicyOverrides {
    fn apply(self, mut policy: RetryPolicy) -> RetryPolicy {
        if let Some(max_retries) = self.max_retries {
            policy.max_retries = max_retries;
        }
        if let Some(ms) = self.base_delay {
            policy.base_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.max_delay {
            policy.max_delay = Duration::from_millis(ms);
        }
        if let Some(codes) = self.retryable_status_codes {
            policy.retryable_status_codes = codes;
        }
        if let Some(codes) = self.non_retryable_status_codes {
            policy.non_retryable_status_codes = codes;
        }
        if let Some(codes) = self.network_error_codes {
            policy.network_error_codes = codes;
        }
        if let Some(threshold) = self.alert_threshold {
            policy.alert_threshold = threshold;
        }
        if let Some(log) = self.log_retry_details {
            policy.log_retry_details = log;
        }
        policy
    }
}

/// Load a policy, falling back to defaults on any problem
pub fn load_policy(source: &PolicySource) -> RetryPolicy {
    let loaded = match source {
        PolicySource::Defaults => return RetryPolicy::default(),
        PolicySource::Json(contents) => parse_policy(contents, ConfigFormat::Json),
        PolicySource::Toml(contents) => parse_policy(contents, ConfigFormat::Toml),
        PolicySource::File(path) => load_policy_file(path),
    };

    match loaded {
        Ok(policy) => policy,
        Err(e) => {
            tracing::debug!(error = %e, source = ?source, "Using default retry policy");
            RetryPolicy::default()
        }
    }
}

/// Parse and validate a (possibly partial) policy document
///
/// # Errors
/// Returns `RetryLabError::Config` if the document is malformed or the
/// merged policy fails validation.
pub fn parse_policy(contents: &str, format: ConfigFormat) -> Result<RetryPolicy> {
    let overrides: PolicyOverrides = match format {
        ConfigFormat::Json => serde_json::from_str(contents)
            .map_err(|e| RetryLabError::Config(format!("Invalid JSON format: {}", e)))?,
        ConfigFormat::Toml => toml::from_str(contents)
            .map_err(|e| RetryLabError::Config(format!("Invalid TOML format: {}", e)))?,
    };

    let policy = overrides.apply(RetryPolicy::default());
    policy.validate()?;
    Ok(policy)
}

fn load_policy_file(path: &Path) -> Result<RetryPolicy> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        RetryLabError::Config(format!("Unsupported config format: {}", path.display()))
    })?;

    let contents = std::fs::read_to_string(path).map_err(|e| {
        RetryLabError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;

    tracing::info!(path = %path.display(), "Loading retry policy from file");
    parse_policy(&contents, format)
}

/// Pick the policy source from the environment and working directory
pub fn resolve_policy_source() -> PolicySource {
    if let Ok(path) = std::env::var(POLICY_PATH_ENV) {
        if !path.trim().is_empty() {
            return PolicySource::File(PathBuf::from(path));
        }
    }

    probe_policy_paths().map_or(PolicySource::Defaults, PolicySource::File)
}

/// First existing policy file among the standard locations
pub fn probe_policy_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    PROBE_PATHS.iter().map(|relative| cwd.join(relative)).find(|path| path.exists())
}

/// Root directory for alert logs and reports
pub fn artifact_dir() -> PathBuf {
    std::env::var(ARTIFACT_DIR_ENV)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_DIR), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::{Builder, TempDir};

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    #[test]
    fn test_defaults_source() {
        assert_eq!(load_policy(&PolicySource::Defaults), RetryPolicy::default());
    }

    #[test]
    fn test_full_json_document() {
        let json = r#"{
            "maxRetries": 5,
            "baseDelay": 500,
            "maxDelay": 10000,
            "retryableStatusCodes": [429, 503],
            "nonRetryableStatusCodes": [400],
            "networkErrors": ["ECONNRESET"],
            "alertThreshold": 4,
            "logRetryDetails": false
        }"#;

        let policy = parse_policy(json, ConfigFormat::Json).unwrap();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_millis(10_000));
        assert_eq!(policy.retryable_status_codes, BTreeSet::from([429, 503]));
        assert_eq!(policy.non_retryable_status_codes, BTreeSet::from([400]));
        assert_eq!(policy.network_error_codes, BTreeSet::from(["ECONNRESET".to_string()]));
        assert_eq!(policy.alert_threshold, 4);
        assert!(!policy.log_retry_details);
    }

    #[test]
    fn test_partial_document_merges_over_defaults() {
        let policy = load_policy(&PolicySource::Json(r#"{"maxRetries": 2}"#.to_string()));

        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.base_delay, Duration::from_millis(1000));
        assert!(policy.retryable_status_codes.contains(&429));
    }

    #[test]
    fn test_toml_document() {
        let toml = r#"
            maxRetries = 4
            networkErrors = ["ETIMEDOUT"]
        "#;
        let policy = load_policy(&PolicySource::Toml(toml.to_string()));

        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.network_error_codes.len(), 1);
    }

    #[test]
    fn test_malformed_and_invalid_fall_back() {
        let defaults = RetryPolicy::default();

        assert_eq!(load_policy(&PolicySource::Json("{not json".to_string())), defaults);
        assert_eq!(load_policy(&PolicySource::Json(r#"{"maxRetries": "3"}"#.to_string())), defaults);
        assert_eq!(
            load_policy(&PolicySource::Json(r#"{"baseDelay": 5000, "maxDelay": 100}"#.to_string())),
            defaults
        );
        assert_eq!(load_policy(&PolicySource::Json(r#"{"maxRetries": 101}"#.to_string())), defaults);

        let err = parse_policy(r#"{"maxRetries": 101}"#, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, RetryLabError::Config(_)));
    }

    #[test]
    fn test_file_sources() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("retry-config.json");
        std::fs::write(&path, r#"{"maxRetries": 1}"#).unwrap();
        assert_eq!(load_policy(&PolicySource::File(path)).max_retries, 1);

        let mut toml_file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(toml_file, "baseDelay = 250").unwrap();
        let policy = load_policy(&PolicySource::File(toml_file.path().to_path_buf()));
        assert_eq!(policy.base_delay, Duration::from_millis(250));

        let missing = dir.path().join("absent.json");
        assert_eq!(load_policy(&PolicySource::File(missing)), RetryPolicy::default());

        let yaml = dir.path().join("retry-config.yaml");
        std::fs::write(&yaml, "maxRetries: 1").unwrap();
        assert_eq!(load_policy(&PolicySource::File(yaml)), RetryPolicy::default());
    }

    #[test]
    fn test_resolve_policy_source_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var(POLICY_PATH_ENV, "/etc/retrylab/policy.toml");
        assert_eq!(
            resolve_policy_source(),
            PolicySource::File(PathBuf::from("/etc/retrylab/policy.toml"))
        );
        std::env::remove_var(POLICY_PATH_ENV);
    }

    #[test]
    fn test_artifact_dir_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::remove_var(ARTIFACT_DIR_ENV);
        assert_eq!(artifact_dir(), PathBuf::from("artifacts"));

        std::env::set_var(ARTIFACT_DIR_ENV, "/var/lib/retrylab");
        assert_eq!(artifact_dir(), PathBuf::from("/var/lib/retrylab"));
        std::env::remove_var(ARTIFACT_DIR_ENV);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("policy")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), None);
    }
}
