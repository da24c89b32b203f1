//! Configuration module
//!
//! Handles loading and managing configuration.

pub mod env;
pub mod file;
pub mod profile;

pub use env::EnvConfig;
pub use file::ConfigFile;
pub use profile::{ProfileManager, RunProfile};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::LogLevel;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default output format (table, json, json-pretty, csv, summary)
    pub format: String,

    /// Run classes in parallel by default
    pub parallel: bool,

    /// Maximum classes running at once
    pub max_concurrent: usize,

    /// Default number of rounds
    pub rounds: u32,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Colored terminal output
    pub color: bool,

    /// Where saved runs go; the platform data directory when unset
    pub results_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
            parallel: false,
            max_concurrent: 4,
            rounds: 1,
            log_level: "info".to_string(),
            color: true,
            results_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Self = if file::is_yaml_file(path) {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if file::is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Parsed log level, falling back to info
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or_default()
    }

    /// Apply `SCENARIO_RUNNER_*` overrides on top of this config
    pub fn with_env(mut self, env: &EnvConfig) -> Self {
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
        if let Some(parallel) = env.parallel {
            self.parallel = parallel;
        }
        if let Some(concurrent) = env.concurrent {
            self.max_concurrent = concurrent;
        }
        if let Some(rounds) = env.rounds {
            self.rounds = rounds;
        }
        if let Some(log) = &env.log {
            self.log_level = log.clone();
        }
        if let Some(dir) = &env.results_dir {
            self.results_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.format, "table");
        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.log_level(), LogLevel::Info);
    }

    #[test]
    fn test_save_load_json_and_yaml() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            format: "csv".to_string(),
            rounds: 5,
            ..AppConfig::default()
        };

        for name in ["app.json", "app.yaml"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(AppConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.yaml");
        std::fs::write(&path, "parallel: true\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert!(config.parallel);
        assert_eq!(config.rounds, 1);
    }

    #[test]
    fn test_env_overrides() {
        let env = EnvConfig {
            rounds: Some(7),
            log: Some("debug".to_string()),
            ..EnvConfig::default()
        };
        let config = AppConfig::default().with_env(&env);
        assert_eq!(config.rounds, 7);
        assert_eq!(config.log_level(), LogLevel::Debug);
        assert_eq!(config.format, "table");
    }
}
