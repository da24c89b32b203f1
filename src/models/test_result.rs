//! Test result models
//!
//! Defines per-unit results, per-class reports and run summaries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Test execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
    Error,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
            TestStatus::Skip => "○",
            TestStatus::Error => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Pass)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Skip => write!(f, "SKIP"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single execution unit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub class: String,
    pub method: String,
    pub scenario: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
}

impl TestResult {
    pub fn pass(
        class: impl Into<String>,
        method: impl Into<String>,
        scenario: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            scenario: scenario.into(),
            status: TestStatus::Pass,
            duration_ms,
            message: None,
        }
    }

    pub fn fail(
        class: impl Into<String>,
        method: impl Into<String>,
        scenario: impl Into<String>,
        duration_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: TestStatus::Fail,
            message: Some(message.into()),
            ..Self::pass(class, method, scenario, duration_ms)
        }
    }

    pub fn skip(
        class: impl Into<String>,
        method: impl Into<String>,
        scenario: impl Into<String>,
        duration_ms: u64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            status: TestStatus::Skip,
            message: Some(reason.into()),
            ..Self::pass(class, method, scenario, duration_ms)
        }
    }

    /// The unit could not even be started (e.g. instantiation failed)
    pub fn error(
        class: impl Into<String>,
        method: impl Into<String>,
        scenario: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            status: TestStatus::Error,
            message: Some(error.into()),
            ..Self::pass(class, method, scenario, 0)
        }
    }

    /// `Class::method[scenario]`
    pub fn id(&self) -> String {
        format!("{}::{}[{}]", self.class, self.method, self.scenario)
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.id(),
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Results for one class, or the discovery error that stopped it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassReport {
    pub class: String,
    pub results: Vec<TestResult>,
    pub error: Option<String>,
}

impl ClassReport {
    pub fn new(class: impl Into<String>, results: Vec<TestResult>) -> Self {
        Self {
            class: class.into(),
            results,
            error: None,
        }
    }

    pub fn failed(class: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            results: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary of one run round
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub round: u32,
    pub target: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Unit errors plus classes that failed discovery
    pub errors: usize,
    pub total_duration_ms: u64,
    pub classes: Vec<ClassReport>,
}

impl RunSummary {
    pub fn new(round: u32, target: impl Into<String>, classes: Vec<ClassReport>) -> Self {
        let results = || classes.iter().flat_map(|c| c.results.iter());
        let count = |status: TestStatus| results().filter(|r| r.status == status).count();

        let passed = count(TestStatus::Pass);
        let failed = count(TestStatus::Fail);
        let skipped = count(TestStatus::Skip);
        let errors = count(TestStatus::Error) + classes.iter().filter(|c| c.is_error()).count();
        let total = results().count();
        let total_duration_ms = results().map(|r| r.duration_ms).sum();

        Self {
            round,
            target: target.into(),
            total,
            passed,
            failed,
            skipped,
            errors,
            total_duration_ms,
            classes,
        }
    }

    /// All unit results, class by class
    pub fn results(&self) -> impl Iterator<Item = &TestResult> {
        self.classes.iter().flat_map(|c| c.results.iter())
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Skips do not count as failures
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.errors > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round {} - {}", self.round, self.target)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for class in &self.classes {
            if let Some(error) = &class.error {
                writeln!(f, "  ! {} - {error}", class.class)?;
            }
            for result in &class.results {
                writeln!(f, "  {result}")?;
            }
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Skip: {} | Error: {}",
            self.total, self.passed, self.failed, self.skipped, self.errors
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_creation() {
        let result = TestResult::pass("Calc", "adds", "<default>", 100);
        assert!(result.status.is_success());
        assert_eq!(result.duration_ms, 100);
        assert_eq!(result.id(), "Calc::adds[<default>]");
    }

    #[test]
    fn test_run_summary() {
        let classes = vec![
            ClassReport::new(
                "Calc",
                vec![
                    TestResult::pass("Calc", "adds", "<default>", 100),
                    TestResult::fail("Calc", "divides", "<default>", 50, "division by zero"),
                    TestResult::skip("Calc", "overflows", "<default>", 0, "64-bit only"),
                ],
            ),
            ClassReport::failed("Broken", "exactly one constructor expected"),
        ];

        let summary = RunSummary::new(1, "all", classes);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 1);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_skips_are_not_failures() {
        let classes = vec![ClassReport::new(
            "Assume",
            vec![TestResult::skip("Assume", "galaxies", "<default>", 0, "no FTL")],
        )];
        let summary = RunSummary::new(1, "Assume", classes);
        assert!(!summary.has_failures());
        assert_eq!(summary.pass_rate(), 0.0);
    }
}
