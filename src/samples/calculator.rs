//! Calculator sample
//!
//! Plain class without scenarios, plus a non-test helper method.

use crate::models::{check, check_eq, ClassDescriptor, Scenario, TestOutcome, Visibility};
use crate::registry::{ClassBuilder, TestClass};

/// Plain class: every test runs once against the default scenario
#[derive(Debug, Default)]
pub struct Calculator {
    memory: i64,
}

impl Calculator {
    fn add(&mut self, value: i64) -> i64 {
        self.memory += value;
        self.memory
    }

    fn adds_numbers(&mut self, _: &Scenario) -> TestOutcome {
        self.add(2);
        check_eq(self.add(3), 5)
    }

    fn starts_with_empty_memory(&mut self, _: &Scenario) -> TestOutcome {
        check_eq(self.memory, 0)
    }

    fn refuses_division_by_zero(&mut self, _: &Scenario) -> TestOutcome {
        check(self.memory.checked_div(0).is_none(), "division by zero succeeded")
    }
}

impl TestClass for Calculator {
    fn describe() -> ClassDescriptor {
        ClassBuilder::<Calculator>::new("samples::Calculator")
            .constructor(|| Ok(Calculator::default()))
            .test("adds_numbers", Visibility::PackagePrivate, Calculator::adds_numbers)
            .test(
                "starts_with_empty_memory",
                Visibility::PackagePrivate,
                Calculator::starts_with_empty_memory,
            )
            .test(
                "refuses_division_by_zero",
                Visibility::PackagePrivate,
                Calculator::refuses_division_by_zero,
            )
            .helper("add", Visibility::Private)
            .build()
    }
}
