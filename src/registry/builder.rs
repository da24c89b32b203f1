//! Typed builder for class descriptors

use std::any::{type_name, Any};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::models::{
    ClassDescriptor, ClassKind, ConstructorDecl, MethodDecl, Scenario, TestFailure, TestInstance,
    TestOutcome, Visibility,
};

use super::MultipleScenarios;

/// Builds a [`ClassDescriptor`] for instance type `T`.
///
/// Methods are registered as plain function references taking `&mut T`, so the
/// engine can call them without reflection. The declared [`Visibility`] is kept
/// only so discovery can enforce the naming and access conventions.
///
/// ```ignore
/// ClassBuilder::<Calculator>::new("samples::Calculator")
///     .constructor(|| Ok(Calculator::default()))
///     .test("adds_numbers", Visibility::PackagePrivate, Calculator::adds_numbers)
///     .build()
/// ```
pub struct ClassBuilder<T> {
    descriptor: ClassDescriptor,
    _instance: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> ClassBuilder<T> {
    /// Start a concrete class with no declarations
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            descriptor: ClassDescriptor {
                name: name.into(),
                kind: ClassKind::Concrete,
                parent: None,
                nested: Vec::new(),
                part_of: Vec::new(),
                constructors: Vec::new(),
                methods: Vec::new(),
                scenarios: None,
            },
            _instance: PhantomData,
        }
    }

    /// Declare a zero-argument constructor
    pub fn constructor<F>(mut self, build: F) -> Self
    where
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let build = Arc::new(move || build().map(|instance| Box::new(instance) as TestInstance));
        self.descriptor.constructors.push(ConstructorDecl::no_arg(build));
        self
    }

    /// Declare a constructor taking the given parameter types
    pub fn parameterized_constructor(mut self, params: &[&str]) -> Self {
        let params = params.iter().map(|p| p.to_string()).collect();
        self.descriptor
            .constructors
            .push(ConstructorDecl::with_params(params));
        self
    }

    /// Declare a test entry point
    pub fn test<F>(self, name: impl Into<String>, visibility: Visibility, method: F) -> Self
    where
        F: Fn(&mut T, &Scenario) -> TestOutcome + Send + Sync + 'static,
    {
        self.method(name, visibility, true, method)
    }

    /// Declare a method that is not a test entry point
    pub fn helper(self, name: impl Into<String>, visibility: Visibility) -> Self {
        self.method(name, visibility, false, |_: &mut T, _: &Scenario| Ok(()))
    }

    fn method<F>(mut self, name: impl Into<String>, visibility: Visibility, is_test: bool, method: F) -> Self
    where
        F: Fn(&mut T, &Scenario) -> TestOutcome + Send + Sync + 'static,
    {
        let invoke = Arc::new(move |instance: &mut dyn Any, scenario: &Scenario| {
            match instance.downcast_mut::<T>() {
                Some(instance) => method(instance, scenario),
                None => Err(TestFailure::Failed(format!(
                    "instance is not a {}",
                    type_name::<T>()
                ))),
            }
        });
        self.descriptor.methods.push(MethodDecl {
            name: name.into(),
            visibility,
            is_test,
            invoke,
        });
        self
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.descriptor.parent = Some(parent.into());
        self
    }

    /// Declare a statically nested class
    pub fn nested(mut self, name: impl Into<String>) -> Self {
        self.descriptor.nested.push(name.into());
        self
    }

    /// Declare membership in a suite
    pub fn part_of(mut self, suite: impl Into<String>) -> Self {
        self.descriptor.part_of.push(suite.into());
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.descriptor.kind = ClassKind::Abstract;
        self
    }

    pub fn build(self) -> ClassDescriptor {
        self.descriptor
    }
}

impl<T: MultipleScenarios + Send + 'static> ClassBuilder<T> {
    /// Harvest scenarios through [`MultipleScenarios::scenarios`]
    pub fn with_scenarios(mut self) -> Self {
        self.descriptor.scenarios = Some(Arc::new(|instance: &dyn Any| {
            instance
                .downcast_ref::<T>()
                .map(|instance| instance.scenarios())
                .unwrap_or_default()
        }));
        self
    }
}

impl ClassBuilder<()> {
    /// Abstract class with no instance type of its own
    pub fn abstract_base(name: impl Into<String>) -> Self {
        Self::new(name).abstract_class()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::check_eq;

    #[derive(Default)]
    struct Counter {
        hits: u32,
    }

    impl Counter {
        fn bumps(&mut self, _scenario: &Scenario) -> TestOutcome {
            self.hits += 1;
            check_eq(self.hits, 1)
        }
    }

    impl MultipleScenarios for Counter {
        fn scenarios(&self) -> Vec<Scenario> {
            vec![Scenario::new("one", 1), Scenario::new("two", 2)]
        }
    }

    #[test]
    fn test_builder_records_declarations() {
        let class = ClassBuilder::<Counter>::new("demo::Counter")
            .constructor(|| Ok(Counter::default()))
            .parameterized_constructor(&["u32"])
            .test("bumps", Visibility::PackagePrivate, Counter::bumps)
            .helper("reset", Visibility::Private)
            .extends("demo::Base")
            .nested("demo::Counter::Inner")
            .part_of("demo::Suite")
            .with_scenarios()
            .build();

        assert_eq!(class.kind, ClassKind::Concrete);
        assert_eq!(class.constructors.len(), 2);
        assert_eq!(class.methods.len(), 2);
        assert!(class.methods[0].is_test);
        assert!(!class.methods[1].is_test);
        assert_eq!(class.parent.as_deref(), Some("demo::Base"));
        assert_eq!(class.nested, vec!["demo::Counter::Inner"]);
        assert_eq!(class.part_of, vec!["demo::Suite"]);
        assert!(class.has_scenarios());
        assert_eq!(class.simple_name(), "Counter");
    }

    #[test]
    fn test_invoke_downcasts_instance() {
        let class = ClassBuilder::<Counter>::new("demo::Counter")
            .test("bumps", Visibility::PackagePrivate, Counter::bumps)
            .build();

        let mut instance: TestInstance = Box::new(Counter::default());
        let scenario = Scenario::default_scenario();
        assert!((class.methods[0].invoke)(instance.as_mut(), &scenario).is_ok());

        let mut wrong: TestInstance = Box::new(42_u8);
        assert!((class.methods[0].invoke)(wrong.as_mut(), &scenario).is_err());
    }

    #[test]
    fn test_abstract_base() {
        let class = ClassBuilder::abstract_base("demo::Base")
            .part_of("demo::Suite")
            .build();
        assert!(class.is_abstract());
        assert!(class.constructors.is_empty());
    }
}
