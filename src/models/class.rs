//! Test class descriptors
//!
//! A [`ClassDescriptor`] is everything the engine knows about a test class:
//! constructors, methods, ancestry, nested declarations and suite membership.
//! Descriptors are produced by registration (see `crate::registry`) instead of
//! runtime introspection and never change once registered.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::outcome::TestOutcome;
use super::scenario::Scenario;

/// Owned, type-erased test object. Each execution unit gets its own.
pub type TestInstance = Box<dyn Any + Send>;

/// Builds a fresh instance (zero-argument constructor)
pub type InstanceFn = Arc<dyn Fn() -> anyhow::Result<TestInstance> + Send + Sync>;

/// Calls a test method on an instance with a scenario
pub type InvokeFn = Arc<dyn Fn(&mut dyn Any, &Scenario) -> TestOutcome + Send + Sync>;

/// Harvests scenarios from an instance
pub type ScenarioFn = Arc<dyn Fn(&dyn Any) -> Vec<Scenario> + Send + Sync>;

/// Concrete classes can be instantiated and run; abstract ones only carry
/// declarations for their descendants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Concrete,
    Abstract,
}

/// Declared access level of a method
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    Private,
    /// Visible within the declaring group only, with no explicit modifier
    PackagePrivate,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
            Visibility::PackagePrivate => write!(f, "package-private"),
        }
    }
}

/// A declared constructor
#[derive(Clone)]
pub struct ConstructorDecl {
    pub params: Vec<String>,
    pub(crate) build: Option<InstanceFn>,
}

impl ConstructorDecl {
    pub fn no_arg(build: InstanceFn) -> Self {
        Self {
            params: Vec::new(),
            build: Some(build),
        }
    }

    /// Parameterized constructors are recorded, never called
    pub fn with_params(params: Vec<String>) -> Self {
        Self {
            params,
            build: None,
        }
    }

    pub fn is_zero_arg(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Debug for ConstructorDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstructorDecl({})", self.params.join(", "))
    }
}

/// A method declared directly on a class
#[derive(Clone)]
pub struct MethodDecl {
    pub name: String,
    pub visibility: Visibility,
    /// Marked as a test entry point
    pub is_test: bool,
    pub(crate) invoke: InvokeFn,
}

impl fmt::Debug for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDecl")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("is_test", &self.is_test)
            .finish()
    }
}

/// Registered test class
#[derive(Clone)]
pub struct ClassDescriptor {
    pub name: String,
    pub kind: ClassKind,
    pub parent: Option<String>,
    /// Statically nested declarations, by qualified name
    pub nested: Vec<String>,
    /// Suites this class declares itself part of
    pub part_of: Vec<String>,
    pub constructors: Vec<ConstructorDecl>,
    pub methods: Vec<MethodDecl>,
    pub(crate) scenarios: Option<ScenarioFn>,
}

impl ClassDescriptor {
    pub fn is_abstract(&self) -> bool {
        self.kind == ClassKind::Abstract
    }

    /// Whether the class supplies its own scenarios
    pub fn has_scenarios(&self) -> bool {
        self.scenarios.is_some()
    }

    /// Short name (last `::` segment)
    pub fn simple_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("nested", &self.nested)
            .field("part_of", &self.part_of)
            .field("constructors", &self.constructors)
            .field("methods", &self.methods)
            .field("has_scenarios", &self.has_scenarios())
            .finish()
    }
}

impl fmt::Display for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
