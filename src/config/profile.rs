//! Run profiles
//!
//! A profile is a named selection of targets plus how to run them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named selection of classes and suites to run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunProfile {
    /// Profile name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Class or suite names; empty means every concrete class in the catalog
    #[serde(default)]
    pub targets: Vec<String>,
    /// Number of rounds
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Run classes in parallel
    #[serde(default)]
    pub parallel: bool,
    /// Tags for filtering
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_rounds() -> u32 {
    1
}

impl RunProfile {
    /// Create a new profile
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            targets: Vec::new(),
            rounds: default_rounds(),
            parallel: false,
            tags: Vec::new(),
        }
    }

    /// Every registered class
    pub fn all() -> Self {
        Self::new("all")
            .with_description("Run every concrete class in the catalog")
            .parallel(true)
            .with_tag("comprehensive")
    }

    /// The bundled sample classes and suite
    pub fn samples() -> Self {
        Self::new("samples")
            .with_description("Sample classes: plain, multi-scenario, assumptions and the example suite")
            .with_targets([
                "samples::Calculator",
                "samples::CurrencyConversion",
                "samples::AssumeThatExample",
                "samples::ExampleSuite",
            ])
            .with_tag("samples")
    }

    /// Repeat the scenario sample to catch order-dependent behaviour
    pub fn soak() -> Self {
        Self::new("soak")
            .with_description("Run the multi-scenario sample for ten rounds")
            .with_targets(["samples::CurrencyConversion"])
            .with_rounds(10)
            .with_tag("stability")
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Get predefined profiles
    pub fn predefined() -> Vec<RunProfile> {
        vec![Self::all(), Self::samples(), Self::soak()]
    }

    /// Find a predefined profile by name
    pub fn find(name: &str) -> Option<RunProfile> {
        Self::predefined().into_iter().find(|p| p.name == name)
    }
}

/// Holds predefined profiles plus the ones loaded from config files
pub struct ProfileManager {
    profiles: BTreeMap<String, RunProfile>,
}

impl ProfileManager {
    /// Create a new profile manager with the predefined profiles
    pub fn new() -> Self {
        let mut manager = Self {
            profiles: BTreeMap::new(),
        };
        for profile in RunProfile::predefined() {
            manager.add(profile);
        }
        manager
    }

    /// Add a profile, replacing one with the same name
    pub fn add(&mut self, profile: RunProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn get(&self, name: &str) -> Option<&RunProfile> {
        self.profiles.get(name)
    }

    /// Profiles sorted by name
    pub fn list(&self) -> Vec<&RunProfile> {
        self.profiles.values().collect()
    }
}

impl Default for ProfileManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_profile() {
        let profile = RunProfile::samples();
        assert_eq!(profile.name, "samples");
        assert!(profile.targets.contains(&"samples::ExampleSuite".to_string()));
        assert_eq!(profile.rounds, 1);
    }

    #[test]
    fn test_all_profile_has_no_targets() {
        let profile = RunProfile::all();
        assert!(profile.targets.is_empty());
        assert!(profile.parallel);
    }

    #[test]
    fn test_find_profile() {
        assert_eq!(RunProfile::find("soak").map(|p| p.rounds), Some(10));
        assert!(RunProfile::find("nightly").is_none());
    }

    #[test]
    fn test_profile_manager_override() {
        let mut manager = ProfileManager::new();
        assert!(manager.get("samples").is_some());

        manager.add(RunProfile::new("samples").with_rounds(3));
        assert_eq!(manager.get("samples").map(|p| p.rounds), Some(3));
        assert_eq!(manager.list().len(), 3);
    }

    #[test]
    fn test_yaml_profile_defaults() {
        let yaml = "name: quick\ntargets:\n  - \"samples::Calculator\"\n";
        let profile: RunProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.rounds, 1);
        assert!(!profile.parallel);
    }
}
