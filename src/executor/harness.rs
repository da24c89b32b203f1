//! Per-unit test harness
//!
//! The harness receives one execution unit together with a fresh instance it
//! owns outright, calls the method and reports what happened. It is the only
//! place where a failed assumption turns into a skip.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::discovery::ExecutionUnit;
use crate::models::{TestFailure, TestInstance};

/// What running one unit produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitOutcome {
    Passed,
    Failed(String),
    Skipped(String),
}

/// Runs a single execution unit against its own instance
pub trait Harness: Send + Sync {
    fn run(&self, unit: &ExecutionUnit, instance: TestInstance) -> UnitOutcome;
}

/// Calls the method on the current thread; panics count as failures
#[derive(Clone, Copy, Debug, Default)]
pub struct InProcessHarness;

impl Harness for InProcessHarness {
    fn run(&self, unit: &ExecutionUnit, mut instance: TestInstance) -> UnitOutcome {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            unit.method().invoke(&mut *instance, unit.scenario())
        }));

        match outcome {
            Ok(Ok(())) => UnitOutcome::Passed,
            Ok(Err(TestFailure::Failed(message))) => UnitOutcome::Failed(message),
            Ok(Err(TestFailure::AssumptionViolated(reason))) => UnitOutcome::Skipped(reason),
            Err(payload) => UnitOutcome::Failed(panic_message(payload.as_ref())),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
