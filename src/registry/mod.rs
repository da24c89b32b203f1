//! Test class registration
//!
//! Test classes describe themselves through [`TestClass`] and are collected in
//! a [`Catalog`]. The catalog also owns the explicit suite-membership map:
//! suite identifier to an ordered, duplicate-free list of declared members.

mod builder;

pub use builder::ClassBuilder;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::discovery::DiscoveryError;
use crate::models::{ClassDescriptor, Scenario};

/// Implemented by every registrable test type
pub trait TestClass: Send + 'static {
    fn describe() -> ClassDescriptor;
}

/// Capability of classes that run every test once per supplied scenario
pub trait MultipleScenarios {
    fn scenarios(&self) -> Vec<Scenario>;
}

/// Registration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("class {0} is already registered")]
    DuplicateClass(String),
}

/// Registered classes and declared suite membership
#[derive(Clone, Default)]
pub struct Catalog {
    classes: Vec<Arc<ClassDescriptor>>,
    index: HashMap<String, usize>,
    suites: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a test type
    pub fn register<T: TestClass>(&mut self) -> Result<(), RegistryError> {
        self.add(T::describe())
    }

    /// Register a descriptor; its `part_of` declarations feed the suite map
    pub fn add(&mut self, class: ClassDescriptor) -> Result<(), RegistryError> {
        if self.index.contains_key(&class.name) {
            return Err(RegistryError::DuplicateClass(class.name));
        }

        for suite in &class.part_of {
            self.include(suite.clone(), class.name.clone());
        }

        debug!("Registered {} ({:?})", class.name, class.kind);
        self.index.insert(class.name.clone(), self.classes.len());
        self.classes.push(Arc::new(class));
        Ok(())
    }

    /// Make a suite known even before anything joins it
    pub fn declare_suite(&mut self, suite: impl Into<String>) {
        self.suites.entry(suite.into()).or_default();
    }

    /// Add an explicit membership; repeated calls are no-ops
    pub fn include(&mut self, suite: impl Into<String>, class: impl Into<String>) {
        let class = class.into();
        let members = self.suites.entry(suite.into()).or_default();
        if !members.contains(&class) {
            members.push(class);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ClassDescriptor>> {
        self.index.get(name).map(|&i| &self.classes[i])
    }

    /// Like [`Catalog::get`], but a missing class is a discovery error
    pub fn require(&self, name: &str) -> Result<&Arc<ClassDescriptor>, DiscoveryError> {
        self.get(name)
            .ok_or_else(|| DiscoveryError::UnknownClass(name.to_string()))
    }

    /// Classes in registration order
    pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassDescriptor>> {
        self.classes.iter()
    }

    pub fn suites(&self) -> impl Iterator<Item = &str> {
        self.suites.keys().map(String::as_str)
    }

    pub fn has_suite(&self, suite: &str) -> bool {
        self.suites.contains_key(suite)
    }

    /// Members declared for a suite, before any ancestry or nesting expansion
    pub fn declared_members(&self, suite: &str) -> Option<&[String]> {
        self.suites.get(suite).map(Vec::as_slice)
    }

    /// Suites that list `class` as a declared member
    pub fn suites_declared_by(&self, class: &str) -> Vec<&str> {
        self.suites
            .iter()
            .filter(|(_, members)| members.iter().any(|m| m == class))
            .map(|(suite, _)| suite.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visibility;

    struct Plain;

    impl TestClass for Plain {
        fn describe() -> ClassDescriptor {
            ClassBuilder::<Plain>::new("demo::Plain")
                .constructor(|| Ok(Plain))
                .test("works", Visibility::PackagePrivate, |_, _| Ok(()))
                .part_of("demo::Suite")
                .build()
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut catalog = Catalog::new();
        catalog.register::<Plain>().unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("demo::Plain").is_some());
        assert!(catalog.require("demo::Missing").is_err());
        assert_eq!(
            catalog.declared_members("demo::Suite"),
            Some(&["demo::Plain".to_string()][..])
        );
        assert_eq!(catalog.suites_declared_by("demo::Plain"), vec!["demo::Suite"]);
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let mut catalog = Catalog::new();
        catalog.register::<Plain>().unwrap();
        assert_eq!(
            catalog.register::<Plain>(),
            Err(RegistryError::DuplicateClass("demo::Plain".to_string()))
        );
    }

    #[test]
    fn test_include_deduplicates() {
        let mut catalog = Catalog::new();
        catalog.declare_suite("demo::Empty");
        catalog.include("demo::Suite", "demo::A");
        catalog.include("demo::Suite", "demo::B");
        catalog.include("demo::Suite", "demo::A");

        assert_eq!(catalog.declared_members("demo::Empty"), Some(&[][..]));
        assert_eq!(
            catalog.declared_members("demo::Suite").unwrap(),
            ["demo::A".to_string(), "demo::B".to_string()]
        );
        assert_eq!(catalog.suites().collect::<Vec<_>>(), vec!["demo::Empty", "demo::Suite"]);
    }
}
