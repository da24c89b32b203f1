//! Test execution runner
//!
//! Discovers each class and runs its execution units one after another,
//! building a fresh instance for every unit.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::discovery::{self, ClassError, DiscoveryError, ExecutionUnit};
use crate::models::{ClassReport, RunSummary, TestResult};
use crate::registry::Catalog;
use crate::suite::{self, Suite};
use crate::utils::Timer;

use super::harness::{Harness, InProcessHarness, UnitOutcome};

/// Sequential test runner
#[derive(Clone)]
pub struct TestRunner {
    catalog: Arc<Catalog>,
    harness: Arc<dyn Harness>,
}

impl TestRunner {
    /// Create a runner using the in-process harness
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            harness: Arc::new(InProcessHarness),
        }
    }

    /// Replace the harness that executes units
    pub fn with_harness(mut self, harness: impl Harness + 'static) -> Self {
        self.harness = Arc::new(harness);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Turn run targets (suite or class names) into a flat class list.
    ///
    /// A suite expands to its members; a class expands to itself plus the
    /// classes nested in its hierarchy. Duplicates are dropped.
    pub fn resolve_targets<S: AsRef<str>>(&self, targets: &[S]) -> Result<Suite, DiscoveryError> {
        let mut resolved = Suite::new(
            targets
                .iter()
                .map(|t| t.as_ref())
                .collect::<Vec<_>>()
                .join(","),
        );

        for target in targets {
            let target = target.as_ref();
            let expanded = if self.catalog.has_suite(target) {
                suite::members_of(&self.catalog, target)?
            } else {
                suite::closure_of(&self.catalog, target)?
            };
            for member in expanded.members() {
                resolved.insert(member.clone());
            }
        }

        Ok(resolved)
    }

    /// Discover the execution units of one class without running them
    pub fn plan(&self, class: &str) -> Result<Vec<ExecutionUnit>, ClassError> {
        let class = self.catalog.require(class)?;
        discovery::discover(class)
    }

    /// Run one unit against a fresh instance
    pub fn run_unit(&self, unit: &ExecutionUnit) -> TestResult {
        let class = unit.class().name.as_str();
        let method = unit.method().name();
        let scenario = unit.scenario().label();

        let instance = match unit.instantiate() {
            Ok(instance) => instance,
            Err(e) => {
                error!("Cannot instantiate {} for {}: {}", class, unit.id(), e);
                return TestResult::error(class, method, scenario, e.to_string());
            }
        };

        let timer = Timer::start(unit.id());
        let outcome = self.harness.run(unit, instance);
        let duration_ms = timer.stop_ms();

        match outcome {
            UnitOutcome::Passed => TestResult::pass(class, method, scenario, duration_ms),
            UnitOutcome::Failed(cause) => {
                TestResult::fail(class, method, scenario, duration_ms, cause)
            }
            UnitOutcome::Skipped(reason) => {
                TestResult::skip(class, method, scenario, duration_ms, reason)
            }
        }
    }

    /// Discover and run every unit of one class
    pub fn run_class(&self, class: &str) -> ClassReport {
        let units = match self.plan(class) {
            Ok(units) => units,
            Err(e) => {
                error!("Discovery failed for {}: {}", class, e);
                return ClassReport::failed(class, e.to_string());
            }
        };

        debug!("Running {} unit(s) of {}", units.len(), class);
        let results = units
            .iter()
            .map(|unit| {
                let result = self.run_unit(unit);
                info!("  {}", result);
                result
            })
            .collect();

        ClassReport::new(class, results)
    }

    /// Run every listed class once
    pub fn run_all<S: AsRef<str>>(&self, classes: &[S]) -> RunSummary {
        self.run_round(1, "all", classes)
    }

    /// Run every listed class, labelling the summary with `round` and `target`
    pub fn run_round<S: AsRef<str>>(&self, round: u32, target: &str, classes: &[S]) -> RunSummary {
        info!("Starting round {} for {} ({} classes)", round, target, classes.len());

        let start = Instant::now();
        let reports = classes
            .iter()
            .map(|class| self.run_class(class.as_ref()))
            .collect();
        let summary = RunSummary::new(round, target, reports);

        info!(
            "Round {} completed in {}ms - Pass: {}/{} ({:.1}%)",
            round,
            start.elapsed().as_millis(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        summary
    }

    /// Run multiple rounds; discovery is repeated every round
    pub fn run_rounds<S: AsRef<str>>(&self, rounds: u32, target: &str, classes: &[S]) -> Vec<RunSummary> {
        info!("Running {} rounds for {}", rounds, target);

        (1..=rounds)
            .map(|round| {
                info!("=== Round {}/{} ===", round, rounds);
                self.run_round(round, target, classes)
            })
            .collect()
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::models::{check_eq, Scenario, TestInstance, TestOutcome, TestStatus, Visibility};
    use crate::registry::{ClassBuilder, MultipleScenarios};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Tally {
        count: u32,
    }

    impl Tally {
        // Each unit must see a brand-new instance
        fn starts_at_zero(&mut self, _: &Scenario) -> TestOutcome {
            check_eq(self.count, 0)?;
            self.count += 1;
            Ok(())
        }

        fn increments_once(&mut self, _: &Scenario) -> TestOutcome {
            self.count += 1;
            check_eq(self.count, 1)
        }
    }

    impl MultipleScenarios for Tally {
        fn scenarios(&self) -> Vec<Scenario> {
            vec![Scenario::new("one", 1_u32), Scenario::new("two", 2_u32)]
        }
    }

    struct Broken;

    fn catalog() -> Arc<Catalog> {
        let mut catalog = Catalog::new();
        catalog
            .add(
                ClassBuilder::<Tally>::new("demo::Tally")
                    .constructor(|| Ok(Tally::default()))
                    .test("starts_at_zero", Visibility::PackagePrivate, Tally::starts_at_zero)
                    .test("increments_once", Visibility::PackagePrivate, Tally::increments_once)
                    .with_scenarios()
                    .part_of("demo::Suite")
                    .build(),
            )
            .unwrap();
        catalog
            .add(
                ClassBuilder::<Broken>::new("demo::Broken")
                    .constructor(|| Ok(Broken))
                    .constructor(|| Ok(Broken))
                    .test("never_runs", Visibility::PackagePrivate, |_, _| Ok(()))
                    .part_of("demo::Suite")
                    .build(),
            )
            .unwrap();
        Arc::new(catalog)
    }

    #[test]
    fn test_runner_creation() {
        let runner = TestRunner::new(catalog());
        assert_eq!(runner.catalog().len(), 2);
    }

    #[test]
    fn test_fresh_instance_per_unit() {
        let runner = TestRunner::new(catalog());
        let report = runner.run_class("demo::Tally");
        assert!(!report.is_error());
        assert_eq!(report.results.len(), 4);
        assert!(report.results.iter().all(|r| r.status == TestStatus::Pass));
    }

    #[test]
    fn test_sibling_unaffected_by_broken_class() {
        let runner = TestRunner::new(catalog());
        let summary = runner.run_all(&["demo::Broken", "demo::Tally"]);

        assert_eq!(summary.classes.len(), 2);
        assert!(summary.classes[0].is_error());
        assert!(summary.classes[0]
            .error
            .as_deref()
            .unwrap()
            .contains("demo::Broken"));
        assert_eq!(summary.classes[1].results.len(), 4);
        assert_eq!(summary.passed, 4);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_resolve_targets_mixes_suites_and_classes() {
        let runner = TestRunner::new(catalog());
        let resolved = runner
            .resolve_targets(&["demo::Suite", "demo::Tally"])
            .unwrap();
        assert_eq!(
            resolved.members(),
            ["demo::Tally".to_string(), "demo::Broken".to_string()]
        );
        assert!(runner.resolve_targets(&["demo::Nothing"]).is_err());
    }

    #[test]
    fn test_suite_runs_despite_unrelated_orphan() {
        let mut catalog = (*catalog()).clone();
        catalog
            .add(
                ClassBuilder::<Broken>::new("other::Orphan")
                    .constructor(|| Ok(Broken))
                    .extends("other::Unregistered")
                    .build(),
            )
            .unwrap();
        let runner = TestRunner::new(Arc::new(catalog));

        let resolved = runner.resolve_targets(&["demo::Suite"]).unwrap();
        let summary = runner.run_all(resolved.members());
        assert_eq!(summary.passed, 4);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_rounds_rediscover_identically() {
        let runner = TestRunner::new(catalog());
        let summaries = runner.run_rounds(3, "demo::Tally", &["demo::Tally"]);
        assert_eq!(summaries.len(), 3);
        for (i, summary) in summaries.iter().enumerate() {
            assert_eq!(summary.round, i as u32 + 1);
            assert_eq!(summary.total, 4);
        }

        let ids = |s: &RunSummary| {
            let mut ids: Vec<_> = s.results().map(|r| r.id()).collect();
            ids.sort();
            ids
        };
        assert_eq!(ids(&summaries[0]), ids(&summaries[2]));
    }

    struct CountingHarness(AtomicUsize);

    impl Harness for CountingHarness {
        fn run(&self, _unit: &ExecutionUnit, _instance: TestInstance) -> UnitOutcome {
            self.0.fetch_add(1, Ordering::SeqCst);
            UnitOutcome::Skipped("counted only".to_string())
        }
    }

    #[test]
    fn test_custom_harness() {
        let runner = TestRunner::new(catalog()).with_harness(CountingHarness(AtomicUsize::new(0)));
        let report = runner.run_class("demo::Tally");
        assert!(report.results.iter().all(|r| r.status == TestStatus::Skip));
    }

    #[test]
    fn test_plan_does_not_run() {
        let runner = TestRunner::new(catalog());
        let units = runner.plan("demo::Tally").unwrap();
        assert_eq!(units.len(), 4);
        assert!(runner.plan("demo::Broken").is_err());
        assert!(units.iter().all(|u| !u.scenario().is_default()));
    }
}
