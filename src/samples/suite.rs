//! Suite declared on an abstract parent
//!
//! Concrete subclasses inherit the membership, and a statically nested class
//! joins the same suite through its enclosing declaration.

use crate::models::{check, check_eq, ClassDescriptor, Scenario, TestOutcome, Visibility};
use crate::registry::{ClassBuilder, TestClass};

pub const EXAMPLE_SUITE: &str = "samples::ExampleSuite";

/// Abstract parent; its membership and nested class apply to every subclass
pub struct SuiteParent;

impl SuiteParent {
    pub fn describe() -> ClassDescriptor {
        ClassBuilder::abstract_base("samples::SuiteParent")
            .part_of(EXAMPLE_SUITE)
            .nested("samples::SuiteParent::InnerSuiteMember")
            .build()
    }
}

/// Joins the suite only through its parent
#[derive(Debug)]
pub struct SuiteMember {
    greeting: String,
}

impl SuiteMember {
    fn greets(&mut self, _: &Scenario) -> TestOutcome {
        check_eq(self.greeting.as_str(), "hello")
    }
}

impl TestClass for SuiteMember {
    fn describe() -> ClassDescriptor {
        ClassBuilder::<SuiteMember>::new("samples::SuiteMember")
            .extends("samples::SuiteParent")
            .constructor(|| {
                Ok(SuiteMember {
                    greeting: "hello".to_string(),
                })
            })
            .test("greets", Visibility::PackagePrivate, SuiteMember::greets)
            .build()
    }
}

/// Nested in the parent, so it is pulled in with every subclass
#[derive(Debug, Default)]
pub struct InnerSuiteMember {
    visits: u32,
}

impl InnerSuiteMember {
    fn is_visited_once(&mut self, _: &Scenario) -> TestOutcome {
        self.visits += 1;
        check(self.visits == 1, "instance reused between units")
    }
}

impl TestClass for InnerSuiteMember {
    fn describe() -> ClassDescriptor {
        ClassBuilder::<InnerSuiteMember>::new("samples::SuiteParent::InnerSuiteMember")
            .constructor(|| Ok(InnerSuiteMember::default()))
            .test(
                "is_visited_once",
                Visibility::PackagePrivate,
                InnerSuiteMember::is_visited_once,
            )
            .build()
    }
}
