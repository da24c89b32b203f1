//! Data models for scenario-aware test execution
//!
//! This module contains all data structures used throughout the application.

mod class;
mod outcome;
mod scenario;
mod test_result;

pub use class::{
    ClassDescriptor, ClassKind, ConstructorDecl, InstanceFn, InvokeFn, MethodDecl, ScenarioFn,
    TestInstance, Visibility,
};
pub use outcome::{assume, check, check_eq, TestFailure, TestOutcome};
pub use scenario::{Scenario, DEFAULT_SCENARIO_LABEL};
pub use test_result::{ClassReport, RunSummary, TestResult, TestStatus};
