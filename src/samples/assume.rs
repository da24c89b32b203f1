//! Assumption example
//!
//! A test whose precondition never holds, reported as skipped rather than failed.

use crate::models::{assume, ClassDescriptor, Scenario, TestOutcome, Visibility};
use crate::registry::{ClassBuilder, TestClass};

/// The assumption never holds, so the only test is reported as skipped
#[derive(Debug, Default)]
pub struct AssumeThatExample {
    we_have_ftl: bool,
}

impl AssumeThatExample {
    fn when_we_fare_the_galaxies(&mut self, _: &Scenario) -> TestOutcome {
        assume(self.we_have_ftl, "we have no faster-than-light drive")?;
        Ok(())
    }
}

impl TestClass for AssumeThatExample {
    fn describe() -> ClassDescriptor {
        ClassBuilder::<AssumeThatExample>::new("samples::AssumeThatExample")
            .constructor(|| Ok(AssumeThatExample::default()))
            .test(
                "when_we_fare_the_galaxies",
                Visibility::PackagePrivate,
                AssumeThatExample::when_we_fare_the_galaxies,
            )
            .build()
    }
}
