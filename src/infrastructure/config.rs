//! Bootstrap configuration.
//!
//! The gate is configured once at startup with the quota grants and an
//! optional retention policy for the dedup store. Configuration is a JSON
//! document:
//!
//! ```json
//! {
//!   "quotas": [
//!     { "subject": 1, "monthly_capacity": 1000, "minute_capacity": 1 },
//!     { "subject": 2, "monthly_capacity": 2000, "minute_capacity": 20 }
//!   ],
//!   "retention": { "interval_secs": 60, "max_age_secs": 86400, "warn_above": 1000000 }
//! }
//! ```

use crate::application::retention::RetentionConfig;
use crate::domain::error::ConfigError;
use crate::domain::grant::QuotaGrant;
use crate::domain::ids::Subject;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the path of the JSON config file.
pub const CONFIG_PATH_ENV: &str = "QUOTA_GATE_CONFIG";

/// Complete bootstrap configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Quota grants, one per subject
    pub quotas: Vec<QuotaGrant>,
    /// Dedup retention; tokens are kept forever when absent
    #[serde(default)]
    pub retention: Option<RetentionSettings>,
}

/// Retention settings as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionSettings {
    /// Seconds between sweeps
    pub interval_secs: u64,
    /// Seconds a token is remembered
    pub max_age_secs: u64,
    /// Warn once the store holds more tokens than this
    #[serde(default)]
    pub warn_above: Option<usize>,
}

impl TryFrom<RetentionSettings> for RetentionConfig {
    type Error = ConfigError;

    fn try_from(settings: RetentionSettings) -> Result<Self, Self::Error> {
        let config = RetentionConfig::new(
            Duration::from_secs(settings.interval_secs),
            Duration::from_secs(settings.max_age_secs),
        )?;
        Ok(match settings.warn_above {
            Some(threshold) => config.with_warn_above(threshold),
            None => config,
        })
    }
}

impl Default for GateConfig {
    /// Two demo subjects and no retention.
    fn default() -> Self {
        Self {
            quotas: vec![
                QuotaGrant::new(Subject::new(1), 1000, 1),
                QuotaGrant::new(Subject::new(2), 2000, 20),
            ],
            retention: None,
        }
    }
}

impl GateConfig {
    /// Parse and validate a JSON config document.
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` for malformed JSON, or the validation
    /// error of [`GateConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`GateConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load the file named by `QUOTA_GATE_CONFIG`, or the defaults if unset.
    ///
    /// # Errors
    /// As [`GateConfig::from_path`] when the variable is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => {
                tracing::info!(path = ?path, "loading quota config");
                Self::from_path(path)
            }
            None => {
                tracing::info!("{} not set, using default quotas", CONFIG_PATH_ENV);
                Ok(Self::default())
            }
        }
    }

    /// Check every grant and the retention settings.
    ///
    /// # Errors
    /// Returns the first problem found: an invalid grant, a duplicated
    /// subject, or a zero retention duration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = AHashSet::with_capacity(self.quotas.len());
        for grant in &self.quotas {
            grant.validate()?;
            if !seen.insert(grant.subject) {
                return Err(ConfigError::DuplicateSubject(grant.subject));
            }
        }
        self.retention_config()?;
        Ok(())
    }

    /// Retention settings converted for the sweeper.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroRetentionInterval` or
    /// `ConfigError::ZeroRetentionAge` for zero durations.
    pub fn retention_config(&self) -> Result<Option<RetentionConfig>, ConfigError> {
        self.retention.map(RetentionConfig::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();
        assert_eq!(config.quotas.len(), 2);
        assert_eq!(config.quotas[0], QuotaGrant::new(Subject::new(1), 1000, 1));
        assert!(config.retention.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "quotas": [{ "subject": 7, "monthly_capacity": 50, "minute_capacity": 5 }],
            "retention": { "interval_secs": 30, "max_age_secs": 600 }
        }"#;

        let config = GateConfig::from_json_str(json).unwrap();
        assert_eq!(config.quotas[0].subject, Subject::new(7));

        let retention = config.retention_config().unwrap().unwrap();
        assert_eq!(retention.interval, Duration::from_secs(30));
        assert_eq!(retention.max_age, Duration::from_secs(600));
        assert_eq!(retention.warn_above, None);
    }

    #[test]
    fn test_duplicate_subject() {
        let json = r#"{ "quotas": [
            { "subject": 1, "monthly_capacity": 5, "minute_capacity": 1 },
            { "subject": 1, "monthly_capacity": 9, "minute_capacity": 2 }
        ] }"#;

        assert!(matches!(
            GateConfig::from_json_str(json),
            Err(ConfigError::DuplicateSubject(_))
        ));
    }

    #[test]
    fn test_zero_retention_interval() {
        let json = r#"{
            "quotas": [],
            "retention": { "interval_secs": 0, "max_age_secs": 600 }
        }"#;

        assert!(matches!(
            GateConfig::from_json_str(json),
            Err(ConfigError::ZeroRetentionInterval)
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            GateConfig::from_json_str("{ \"quotas\": 3 }"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GateConfig::from_json_str(r#"{ "quotas": [], "extra": true }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "quotas": [{{ "subject": 3, "monthly_capacity": 10, "minute_capacity": 2 }}] }}"#
        )
        .unwrap();

        let config = GateConfig::from_path(file.path()).unwrap();
        assert_eq!(config.quotas.len(), 1);

        assert!(matches!(
            GateConfig::from_path("/definitely/not/here.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_from_env() {
        std::env::remove_var(CONFIG_PATH_ENV);
        assert_eq!(GateConfig::from_env().unwrap(), GateConfig::default());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "quotas": [] }}"#).unwrap();
        std::env::set_var(CONFIG_PATH_ENV, file.path());
        let config = GateConfig::from_env().unwrap();
        std::env::remove_var(CONFIG_PATH_ENV);

        assert!(config.quotas.is_empty());
    }
}
