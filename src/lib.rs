//! scenario-runner - scenario-aware test execution engine
//!
//! Test classes register themselves in a [`Catalog`](registry::Catalog)
//! instead of being found through reflection. For each class the engine
//!
//! - checks that it has exactly one zero-argument constructor,
//! - collects the scenarios it supplies (or the single default scenario),
//! - crosses every scenario with every declared test method,
//! - rejects methods that are not snake_case or not package-private,
//!
//! and hands each resulting [`ExecutionUnit`](discovery::ExecutionUnit) to a
//! [`Harness`](executor::Harness) together with a fresh instance.
//!
//! Suites are resolved from explicit membership declarations, inherited by
//! subclasses and widened by statically nested classes.
//!
//! ## Usage
//!
//! ```bash
//! # Run the sample suite
//! scenario-runner run samples::ExampleSuite
//!
//! # Run a class ten times, classes in parallel, and keep the results
//! scenario-runner run samples::CurrencyConversion --rounds 10 --parallel --save
//!
//! # Show what would run
//! scenario-runner plan samples::CurrencyConversion
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod executor;
pub mod models;
pub mod output;
pub mod registry;
pub mod results;
pub mod samples;
pub mod suite;
pub mod utils;

pub use discovery::{discover, discover_all, ClassError, DiscoveryError, ExecutionUnit};
pub use executor::{Harness, InProcessHarness, TestRunner};
pub use models::{assume, check, check_eq, Scenario, TestOutcome};
pub use registry::{Catalog, ClassBuilder, MultipleScenarios, TestClass};
