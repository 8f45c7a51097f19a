//! Configuration loading and types

use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::WrapErr;
use hostfacts_inventory::DEFAULT_IDENTITY_FILE;
use hostfacts_inventory::host_info::DEFAULT_DEPLOYMENT;
use hostfacts_pkg::PackageCatalogue;
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "HOSTFACTS_CONFIG";

/// Top-level configuration for hostfacts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Agent settings
    #[serde(default)]
    pub agent: AgentConfig,
    /// Package names to query
    #[serde(default)]
    pub packages: PackageCatalogue,
}

/// Agent settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Log level (trace, debug, info, warn, error) or a filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Location of the persisted instance identity
    #[serde(default = "default_identity_file")]
    pub identity_file: PathBuf,
    /// Deployment mode reported in host facts
    #[serde(default = "default_deployment")]
    pub deployment: String,
    /// Bound for each package query command, in seconds
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            identity_file: default_identity_file(),
            deployment: default_deployment(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

impl AgentConfig {
    /// Per-command timeout
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_identity_file() -> PathBuf {
    PathBuf::from(DEFAULT_IDENTITY_FILE)
}

fn default_deployment() -> String {
    DEFAULT_DEPLOYMENT.to_string()
}

fn default_command_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;
        if config.agent.command_timeout_secs == 0 {
            eyre::bail!("command_timeout_secs must be greater than zero");
        }
        Ok(config)
    }

    /// Find the config file to use, if any
    ///
    /// `HOSTFACTS_CONFIG` wins; otherwise the first existing common path.
    #[must_use]
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let mut paths = vec![
            PathBuf::from("hostfacts.toml"),
            PathBuf::from("/etc/hostfacts/hostfacts.toml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("hostfacts/hostfacts.toml"));
        }

        paths.into_iter().find(|path| path.exists())
    }
}
