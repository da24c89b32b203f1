//! Test execution engine
//!
//! Provides sequential and parallel execution of discovered units.

mod harness;
mod parallel;
mod runner;

pub use harness::{Harness, InProcessHarness, UnitOutcome};
pub use parallel::{AggregateResult, BatchRunner, ParallelExecutor, UnitStats};
pub use runner::TestRunner;
