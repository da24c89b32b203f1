//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SCENARIO_RUNNER";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Output format from SCENARIO_RUNNER_FORMAT
    pub format: Option<String>,
    /// Parallel from SCENARIO_RUNNER_PARALLEL
    pub parallel: Option<bool>,
    /// Max concurrent classes from SCENARIO_RUNNER_CONCURRENT
    pub concurrent: Option<usize>,
    /// Rounds from SCENARIO_RUNNER_ROUNDS
    pub rounds: Option<u32>,
    /// Log level from SCENARIO_RUNNER_LOG
    pub log: Option<String>,
    /// Config file from SCENARIO_RUNNER_CONFIG
    pub config_file: Option<String>,
    /// Results directory from SCENARIO_RUNNER_RESULTS_DIR
    pub results_dir: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            format: get_env("FORMAT"),
            parallel: get_env_bool("PARALLEL"),
            concurrent: get_env_parse("CONCURRENT"),
            rounds: get_env_parse("ROUNDS"),
            log: get_env("LOG"),
            config_file: get_env("CONFIG"),
            results_dir: get_env("RESULTS_DIR"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.format.is_some()
            || self.parallel.is_some()
            || self.concurrent.is_some()
            || self.rounds.is_some()
            || self.log.is_some()
            || self.config_file.is_some()
            || self.results_dir.is_some()
    }

    /// Get rounds with fallback
    pub fn rounds_or(&self, default: u32) -> u32 {
        self.rounds.unwrap_or(default)
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_FORMAT:       {:?}", ENV_PREFIX, self.format);
        println!("  {}_PARALLEL:     {:?}", ENV_PREFIX, self.parallel);
        println!("  {}_CONCURRENT:   {:?}", ENV_PREFIX, self.concurrent);
        println!("  {}_ROUNDS:       {:?}", ENV_PREFIX, self.rounds);
        println!("  {}_LOG:          {:?}", ENV_PREFIX, self.log);
        println!("  {}_CONFIG:       {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_RESULTS_DIR:  {:?}", ENV_PREFIX, self.results_dir);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables in tests
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_{name}"), value.into()));
        self
    }

    pub fn format(self, format: impl Into<String>) -> Self {
        self.set("FORMAT", format)
    }

    pub fn parallel(self, parallel: bool) -> Self {
        self.set("PARALLEL", parallel.to_string())
    }

    pub fn concurrent(self, concurrent: usize) -> Self {
        self.set("CONCURRENT", concurrent.to_string())
    }

    pub fn rounds(self, rounds: u32) -> Self {
        self.set("ROUNDS", rounds.to_string())
    }

    pub fn log(self, level: impl Into<String>) -> Self {
        self.set("LOG", level)
    }

    pub fn results_dir(self, dir: impl Into<String>) -> Self {
        self.set("RESULTS_DIR", dir)
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all SCENARIO_RUNNER environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_FORMAT        Output format (table, json, json-pretty, csv, summary)");
    println!("  {ENV_PREFIX}_PARALLEL      Run classes in parallel (true/false)");
    println!("  {ENV_PREFIX}_CONCURRENT    Maximum classes running at once");
    println!("  {ENV_PREFIX}_ROUNDS        Number of rounds");
    println!("  {ENV_PREFIX}_LOG           Log level (trace, debug, info, warn, error)");
    println!("  {ENV_PREFIX}_CONFIG        Path to configuration file");
    println!("  {ENV_PREFIX}_RESULTS_DIR   Directory for saved runs");
    println!("  RUST_LOG                      Full tracing filter, overrides {ENV_PREFIX}_LOG");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_ROUNDS=10");
    println!("  scenario-runner run samples::ExampleSuite");
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test touches its own variables; the process environment is shared
    // between test threads.

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.format.is_none());
        assert_eq!(config.rounds_or(3), 3);
        assert!(!config.has_any());
    }

    #[test]
    fn test_env_builder() {
        let _guard = EnvBuilder::new()
            .format("csv")
            .rounds(12)
            .concurrent(8)
            .apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.format, Some("csv".to_string()));
        assert_eq!(config.rounds, Some(12));
        assert_eq!(config.concurrent, Some(8));
        assert!(config.has_any());
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = EnvBuilder::new().parallel(true).apply_scoped();
        assert_eq!(EnvConfig::load().parallel, Some(true));
    }

    #[test]
    fn test_env_guard_restores() {
        let key = format!("{ENV_PREFIX}_RESULTS_DIR");
        {
            let _guard = EnvBuilder::new().results_dir("/tmp/runs").apply_scoped();
            assert_eq!(env::var(&key).ok().as_deref(), Some("/tmp/runs"));
        }
        assert!(env::var(&key).is_err());
    }
}
