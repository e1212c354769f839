//! Configuration Management
//!
//! Persistent defaults for netcensus runs. Flags override the config file,
//! which overrides the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Built-in defaults, matching the long-standing run constants.
pub const DEFAULT_REGION: &str = "us-central1";
pub const DEFAULT_BUCKET: &str = "metric-count";
pub const DEFAULT_OBJECT: &str = "network-counts.txt";
pub const DEFAULT_LOG_NAME: &str = "network-summary";
pub const DEFAULT_NAME_FILTER: &str = "hst-tst";
pub const DEFAULT_DELAY_SECS: u64 = 1;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Static target project list for collect runs
    #[serde(default)]
    pub projects: Vec<String>,
    /// Region for region-scoped listings (VPN tunnels, routers)
    #[serde(default)]
    pub region: Option<String>,
    /// Substring filter for project discovery
    #[serde(default)]
    pub name_filter: Option<String>,
    /// Cloud Storage bucket for the blob sink
    #[serde(default)]
    pub bucket: Option<String>,
    /// Object name for the blob sink
    #[serde(default)]
    pub object: Option<String>,
    /// Cloud Logging log name for the structured sink
    #[serde(default)]
    pub log_name: Option<String>,
    /// Project owning the Cloud Logging stream; defaults to the ambient one
    #[serde(default)]
    pub log_project: Option<String>,
    /// Seconds to sleep between projects
    #[serde(default)]
    pub delay_secs: Option<u64>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("netcensus").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn effective_region(&self) -> String {
        self.region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    pub fn effective_name_filter(&self) -> String {
        self.name_filter
            .clone()
            .unwrap_or_else(|| DEFAULT_NAME_FILTER.to_string())
    }

    pub fn effective_bucket(&self) -> String {
        self.bucket
            .clone()
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string())
    }

    pub fn effective_object(&self) -> String {
        self.object
            .clone()
            .unwrap_or_else(|| DEFAULT_OBJECT.to_string())
    }

    pub fn effective_log_name(&self) -> String {
        self.log_name
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_NAME.to_string())
    }

    /// Project owning the log stream (config > gcloud default)
    pub fn effective_log_project(&self) -> Option<String> {
        self.log_project
            .clone()
            .or_else(crate::gcp::auth::get_default_project)
    }

    pub fn effective_delay_secs(&self) -> u64 {
        self.delay_secs.unwrap_or(DEFAULT_DELAY_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = Config::default();
        assert_eq!(config.effective_region(), "us-central1");
        assert_eq!(config.effective_bucket(), "metric-count");
        assert_eq!(config.effective_object(), "network-counts.txt");
        assert_eq!(config.effective_log_name(), "network-summary");
        assert_eq!(config.effective_name_filter(), "hst-tst");
        assert_eq!(config.effective_delay_secs(), 1);
        assert!(config.projects.is_empty());
    }

    #[test]
    fn explicit_values_win() {
        let config = Config {
            region: Some("europe-west3".to_string()),
            bucket: Some("net-reports".to_string()),
            delay_secs: Some(0),
            ..Config::default()
        };
        assert_eq!(config.effective_region(), "europe-west3");
        assert_eq!(config.effective_bucket(), "net-reports");
        assert_eq!(config.effective_delay_secs(), 0);
    }

    #[test]
    fn parses_partial_config_file() {
        let config: Config =
            serde_json::from_str(r#"{"projects": ["mgmt-hst-tst-8"], "region": "us-east1"}"#)
                .unwrap();
        assert_eq!(config.projects, vec!["mgmt-hst-tst-8".to_string()]);
        assert_eq!(config.effective_region(), "us-east1");
        assert_eq!(config.effective_object(), "network-counts.txt");
    }
}
