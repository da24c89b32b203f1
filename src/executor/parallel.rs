//! Parallel test execution
//!
//! Runs classes concurrently. Each class still runs its own units in order on
//! a blocking worker, so instances never cross threads mid-run.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::models::{ClassReport, RunSummary, TestStatus};

use super::TestRunner;

/// Parallel test executor
pub struct ParallelExecutor {
    runner: Arc<TestRunner>,
    max_concurrent: usize,
}

impl ParallelExecutor {
    pub fn new(runner: TestRunner, max_concurrent: usize) -> Self {
        Self {
            runner: Arc::new(runner),
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Run classes concurrently; reports come back in input order
    pub async fn run_classes_parallel<S: AsRef<str>>(&self, classes: &[S]) -> Vec<ClassReport> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::new();

        for class in classes {
            let class = class.as_ref().to_string();
            let semaphore = semaphore.clone();
            let runner = self.runner.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return ClassReport::failed(class, e.to_string()),
                };

                debug!("Starting parallel execution of {}", class);
                let name = class.clone();
                match tokio::task::spawn_blocking(move || runner.run_class(&name)).await {
                    Ok(report) => report,
                    Err(e) => {
                        error!("Worker for {} died: {}", class, e);
                        ClassReport::failed(class, e.to_string())
                    }
                }
            });

            handles.push(handle);
        }

        join_all(handles)
            .await
            .into_iter()
            .zip(classes)
            .map(|(joined, class)| {
                joined.unwrap_or_else(|e| ClassReport::failed(class.as_ref(), e.to_string()))
            })
            .collect()
    }

    /// Run one round of all listed classes in parallel
    pub async fn run_round_parallel<S: AsRef<str>>(
        &self,
        round: u32,
        target: &str,
        classes: &[S],
    ) -> RunSummary {
        info!(
            "Running round {} of {} in parallel (max {} concurrent)",
            round, target, self.max_concurrent
        );

        let start = Instant::now();
        let reports = self.run_classes_parallel(classes).await;
        let summary = RunSummary::new(round, target, reports);

        info!(
            "Parallel execution completed in {}ms - Pass: {}/{} ({:.1}%)",
            start.elapsed().as_millis(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        summary
    }

    /// Run all listed classes once, in parallel
    pub async fn run_all_parallel<S: AsRef<str>>(&self, classes: &[S]) -> RunSummary {
        self.run_round_parallel(1, "all", classes).await
    }
}

/// Batch test runner for multiple rounds
pub struct BatchRunner {
    executor: ParallelExecutor,
    rounds: u32,
}

impl BatchRunner {
    pub fn new(runner: TestRunner, max_concurrent: usize, rounds: u32) -> Self {
        Self {
            executor: ParallelExecutor::new(runner, max_concurrent),
            rounds,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Run multiple rounds of parallel execution
    pub async fn run_rounds<S: AsRef<str>>(&self, target: &str, classes: &[S]) -> Vec<RunSummary> {
        info!("Running {} rounds of parallel tests for {}", self.rounds, target);

        let mut summaries = Vec::new();
        for round in 1..=self.rounds {
            info!("=== Round {}/{} ===", round, self.rounds);
            summaries.push(self.executor.run_round_parallel(round, target, classes).await);
        }
        summaries
    }

    /// Aggregate results across multiple rounds, keyed by unit id
    pub fn aggregate_results(summaries: &[RunSummary]) -> AggregateResult {
        let total_rounds = summaries.len() as u32;
        let mut unit_stats: HashMap<String, UnitStats> = HashMap::new();

        for result in summaries.iter().flat_map(RunSummary::results) {
            let stats = unit_stats.entry(result.id()).or_default();
            match result.status {
                TestStatus::Pass => stats.passes += 1,
                TestStatus::Fail => stats.failures += 1,
                TestStatus::Skip => {
                    stats.skips += 1;
                    continue;
                }
                TestStatus::Error => stats.errors += 1,
            }
            stats.total_duration_ms += result.duration_ms;
        }

        let unit_pass_rates = unit_stats
            .iter()
            .map(|(id, stats)| (id.clone(), stats.pass_rate()))
            .collect();

        let overall_pass_rate = if summaries.is_empty() {
            0.0
        } else {
            summaries.iter().map(RunSummary::pass_rate).sum::<f64>() / summaries.len() as f64
        };

        AggregateResult {
            total_rounds,
            unit_stats,
            unit_pass_rates,
            overall_pass_rate,
        }
    }
}

/// Statistics for a single unit across rounds
#[derive(Clone, Debug, Default)]
pub struct UnitStats {
    pub passes: u32,
    pub failures: u32,
    pub skips: u32,
    pub errors: u32,
    /// Time spent in passed, failed and errored runs
    pub total_duration_ms: u64,
}

impl UnitStats {
    fn counted(&self) -> u32 {
        self.passes + self.failures + self.errors
    }

    /// Skips are left out of the denominator
    pub fn pass_rate(&self) -> f64 {
        match self.counted() {
            0 => 0.0,
            n => (self.passes as f64 / n as f64) * 100.0,
        }
    }

    pub fn avg_duration_ms(&self) -> u64 {
        match self.counted() {
            0 => 0,
            n => self.total_duration_ms / n as u64,
        }
    }
}

/// Aggregate results across multiple rounds
#[derive(Clone, Debug)]
pub struct AggregateResult {
    pub total_rounds: u32,
    pub unit_stats: HashMap<String, UnitStats>,
    pub unit_pass_rates: HashMap<String, f64>,
    pub overall_pass_rate: f64,
}

impl AggregateResult {
    /// Units that both passed and failed at least once, lowest pass rate first
    pub fn flaky_units(&self) -> Vec<(String, f64)> {
        let mut units: Vec<_> = self
            .unit_pass_rates
            .iter()
            .filter(|(_, rate)| **rate > 0.0 && **rate < 100.0)
            .map(|(id, rate)| (id.clone(), *rate))
            .collect();
        units.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        units
    }

    /// Units that passed every counted round
    pub fn stable_units(&self) -> Vec<String> {
        let mut units: Vec<_> = self
            .unit_pass_rates
            .iter()
            .filter(|(_, rate)| **rate >= 100.0)
            .map(|(id, _)| id.clone())
            .collect();
        units.sort();
        units
    }
}
