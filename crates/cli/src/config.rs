//! Configuration management for the CLI

use anyhow::{Context, Result};
use dashboard_lib::DashboardError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI configuration
///
/// Read from `~/.config/sdash/config.json` (optional), then overridden by
/// `SDASH_*` environment variables. Command-line flags win over both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Scheduler API base URL
    #[serde(default)]
    pub api_url: Option<String>,

    /// Utilization refresh interval in seconds for watch mode
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Default output format (`table` or `json`)
    #[serde(default)]
    pub default_format: Option<String>,
}

fn default_refresh_interval() -> u64 {
    60
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            refresh_interval_secs: default_refresh_interval(),
            request_timeout_secs: default_request_timeout(),
            default_format: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from the default file location and environment
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok();
        Self::load_from(path.as_deref())
    }

    /// Load configuration from an optional JSON file and the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json)
                    .required(false),
            );
        }

        let config = builder
            .add_source(config::Environment::with_prefix("SDASH").try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        let parsed: Self = config
            .try_deserialize()
            .context("Failed to parse configuration")?;
        parsed.validate()?;

        Ok(parsed)
    }

    /// Reject values the dashboard cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            return Err(DashboardError::InvalidConfig(
                "refresh_interval_secs must be greater than zero".to_string(),
            )
            .into());
        }
        if self.request_timeout_secs == 0 {
            return Err(DashboardError::InvalidConfig(
                "request_timeout_secs must be greater than zero".to_string(),
            )
            .into());
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("sdash").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DashboardConfig::load_from(Some(&dir.path().join("absent.json"))).unwrap();

        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_file_values_are_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"api_url": "http://singularity.example/singularity/", "refresh_interval_secs": 15, "default_format": "json"}"#,
        )
        .unwrap();

        let config = DashboardConfig::load_from(Some(&path)).unwrap();

        assert_eq!(
            config.api_url.as_deref(),
            Some("http://singularity.example/singularity/")
        );
        assert_eq!(config.refresh_interval(), Duration::from_secs(15));
        assert_eq!(config.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"refresh_interval_secs": 0}"#).unwrap();

        let err = DashboardConfig::load_from(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("refresh_interval_secs"));
    }
}
