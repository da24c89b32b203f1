//! Configuration file management
//!
//! Handles finding, loading, and validating configuration files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::profile::RunProfile;
use super::AppConfig;
use crate::registry::Catalog;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./scenario-runner.yaml",
    "./scenario-runner.yml",
    "./.scenario-runner.yaml",
    "./.scenario-runner/config.yaml",
    "~/.config/scenario-runner/config.yaml",
    "~/.scenario-runner.yaml",
];

const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Full configuration file structure
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Version of config file format
    #[serde(default = "default_version")]
    pub version: String,

    /// Application settings
    #[serde(default)]
    pub app: AppConfig,

    /// Run profiles
    #[serde(default)]
    pub profiles: Vec<RunProfile>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            app: AppConfig::default(),
            profiles: Vec::new(),
        }
    }
}

impl ConfigFile {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load from `path` if given, else from the first standard location,
    /// else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path.map(Path::to_path_buf).or_else(Self::find) {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            anyhow::bail!("Unsupported config version: {}", self.version);
        }

        if self.app.max_concurrent == 0 {
            anyhow::bail!("max_concurrent must be at least 1");
        }

        for profile in &self.profiles {
            if profile.name.trim().is_empty() {
                anyhow::bail!("Profile with empty name");
            }
            if profile.rounds == 0 {
                anyhow::bail!("Profile '{}' must run at least one round", profile.name);
            }
        }

        Ok(())
    }

    /// Check that every profile target names a registered class or suite
    pub fn validate_targets(&self, catalog: &Catalog) -> Result<()> {
        for profile in &self.profiles {
            for target in &profile.targets {
                if catalog.get(target).is_none() && !catalog.has_suite(target) {
                    anyhow::bail!(
                        "Unknown target '{}' in profile '{}'",
                        target,
                        profile.name
                    );
                }
            }
        }
        Ok(())
    }

    /// Generate example configuration
    pub fn example() -> Self {
        Self {
            version: default_version(),
            app: AppConfig {
                parallel: true,
                rounds: 1,
                ..AppConfig::default()
            },
            profiles: vec![
                RunProfile::samples(),
                RunProfile::new("suite-only")
                    .with_description("Only the example suite, three rounds")
                    .with_targets(["samples::ExampleSuite"])
                    .with_rounds(3),
            ],
        }
    }

    /// Get profile by name
    pub fn profile(&self, name: &str) -> Option<&RunProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Merge with another config (other takes precedence)
    pub fn merge(&mut self, other: ConfigFile) {
        let defaults = AppConfig::default();

        if other.app.format != defaults.format {
            self.app.format = other.app.format;
        }
        if other.app.parallel {
            self.app.parallel = true;
        }
        if other.app.max_concurrent != defaults.max_concurrent {
            self.app.max_concurrent = other.app.max_concurrent;
        }
        if other.app.rounds != defaults.rounds {
            self.app.rounds = other.app.rounds;
        }
        if other.app.log_level != defaults.log_level {
            self.app.log_level = other.app.log_level;
        }
        if !other.app.color {
            self.app.color = false;
        }
        if other.app.results_dir.is_some() {
            self.app.results_dir = other.app.results_dir;
        }

        for profile in other.profiles {
            match self.profiles.iter_mut().find(|p| p.name == profile.name) {
                Some(existing) => *existing = profile,
                None => self.profiles.push(profile),
            }
        }
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
pub(crate) fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
