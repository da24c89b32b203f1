//! Output formatters for test results
//!
//! Provides JSON, Table, CSV and summary output formats.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::discovery::ExecutionUnit;
use crate::executor::AggregateResult;
use crate::models::{RunSummary, TestResult, TestStatus};
use crate::suite::Suite;

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown output format: {s}"))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json-pretty",
            OutputFormat::Csv => "csv",
            OutputFormat::Summary => "summary",
        };
        f.write_str(name)
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn json<T: Serialize + ?Sized>(&self, value: &T) -> String {
        let encoded = if self.format == OutputFormat::JsonPretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.unwrap_or_default()
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.colorize {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn paint_rate(&self, rate: f64) -> String {
        let text = format!("{rate:5.1}%");
        match rate {
            r if r >= 90.0 => self.paint(&text, "32"),
            r if r >= 50.0 => self.paint(&text, "33"),
            _ => self.paint(&text, "31"),
        }
    }

    fn status_label(&self, status: TestStatus) -> String {
        let text = format!("{} {}", status.symbol(), status);
        match status {
            TestStatus::Pass => self.paint(&text, "32"),
            TestStatus::Skip => self.paint(&text, "33"),
            TestStatus::Fail | TestStatus::Error => self.paint(&text, "31"),
        }
    }

    /// Format a single test result
    pub fn format_result(&self, result: &TestResult) -> String {
        match self.format {
            OutputFormat::Table => self.format_result_table(result),
            OutputFormat::Json | OutputFormat::JsonPretty => self.json(result),
            OutputFormat::Csv => format_result_csv(result),
            OutputFormat::Summary => format!(
                "{} {} ({}ms)",
                result.status.symbol(),
                result.id(),
                result.duration_ms
            ),
        }
    }

    fn format_result_table(&self, result: &TestResult) -> String {
        let mut line = format!(
            "{:32} {:12} {} [{:>6}ms]",
            result.method,
            result.scenario,
            self.status_label(result.status),
            result.duration_ms
        );
        if let Some(message) = &result.message {
            if result.status != TestStatus::Pass {
                line.push_str(&format!(" {message}"));
            }
        }
        line
    }

    /// Format a run summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json | OutputFormat::JsonPretty => self.json(summary),
            OutputFormat::Csv => format_summary_csv(summary),
            OutputFormat::Summary => format!(
                "{} - Round {}: {}/{} passed ({:.1}%), {} skipped, {} errors in {}ms",
                summary.target,
                summary.round,
                summary.passed,
                summary.total,
                summary.pass_rate(),
                summary.skipped,
                summary.errors,
                summary.total_duration_ms
            ),
        }
    }

    fn format_summary_table(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push_str("\n══════════════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(" Round {} - {}\n", summary.round, summary.target));
        output.push_str("══════════════════════════════════════════════════════════════════════\n");

        for class in &summary.classes {
            output.push_str(&format!(" {}\n", class.class));
            if let Some(error) = &class.error {
                output.push_str(&format!("   {}\n", self.paint(&format!("! {error}"), "31")));
            }
            for result in &class.results {
                output.push_str(&format!("   {}\n", self.format_result_table(result)));
            }
        }

        output.push_str("──────────────────────────────────────────────────────────────────────\n");

        let failed = summary.failed.to_string();
        let failed = if summary.failed > 0 {
            self.paint(&failed, "31")
        } else {
            failed
        };
        output.push_str(&format!(
            " Total: {} | Pass: {} | Fail: {} | Skip: {} | Error: {}\n",
            summary.total,
            self.paint(&summary.passed.to_string(), "32"),
            failed,
            summary.skipped,
            summary.errors
        ));
        output.push_str(&format!(
            " Pass Rate: {} | Duration: {}ms\n",
            self.paint_rate(summary.pass_rate()),
            summary.total_duration_ms
        ));

        output
    }

    /// Format aggregate results across rounds
    pub fn format_aggregate(&self, aggregate: &AggregateResult, target: &str) -> String {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                #[derive(Serialize)]
                struct AggregateJson<'a> {
                    target: &'a str,
                    total_rounds: u32,
                    overall_pass_rate: f64,
                    unit_pass_rates: BTreeMap<&'a str, f64>,
                }

                self.json(&AggregateJson {
                    target,
                    total_rounds: aggregate.total_rounds,
                    overall_pass_rate: aggregate.overall_pass_rate,
                    unit_pass_rates: aggregate
                        .unit_pass_rates
                        .iter()
                        .map(|(id, rate)| (id.as_str(), *rate))
                        .collect(),
                })
            }
            _ => self.format_aggregate_table(aggregate, target),
        }
    }

    fn format_aggregate_table(&self, aggregate: &AggregateResult, target: &str) -> String {
        let mut output = String::new();

        output.push_str("\n══════════════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(
            " Aggregate Results: {} ({} rounds)\n",
            target, aggregate.total_rounds
        ));
        output.push_str("══════════════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(
            " Overall Pass Rate: {}\n\n",
            self.paint_rate(aggregate.overall_pass_rate)
        ));

        let rates: BTreeMap<_, _> = aggregate.unit_pass_rates.iter().collect();
        for (id, rate) in rates {
            let bar_len = ((*rate / 5.0) as usize).min(20);
            output.push_str(&format!(
                " {:48} {}{} {}\n",
                id,
                "█".repeat(bar_len),
                "░".repeat(20 - bar_len),
                self.paint_rate(*rate)
            ));
        }

        let flaky = aggregate.flaky_units();
        if !flaky.is_empty() {
            output.push_str("\n Flaky units:\n");
            for (id, rate) in flaky.iter().take(5) {
                output.push_str(&format!("   - {id} ({rate:.1}%)\n"));
            }
        }

        output
    }

    /// Format the units discovered for a class, without running them
    pub fn format_plan(&self, class: &str, units: &[ExecutionUnit]) -> String {
        #[derive(Serialize)]
        struct PlannedUnit<'a> {
            method: &'a str,
            scenario: &'a str,
        }

        let planned: Vec<_> = units
            .iter()
            .map(|unit| PlannedUnit {
                method: unit.method().name(),
                scenario: unit.scenario().label(),
            })
            .collect();

        match self.format {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                #[derive(Serialize)]
                struct Plan<'a> {
                    class: &'a str,
                    units: &'a [PlannedUnit<'a>],
                }
                self.json(&Plan {
                    class,
                    units: &planned,
                })
            }
            OutputFormat::Csv => {
                let mut output = String::from("class,method,scenario\n");
                for unit in &planned {
                    output.push_str(&format!(
                        "{},{},{}\n",
                        csv_field(class),
                        csv_field(unit.method),
                        csv_field(unit.scenario)
                    ));
                }
                output
            }
            OutputFormat::Summary => format!("{class}: {} unit(s)", planned.len()),
            OutputFormat::Table => {
                let mut output = format!("\n{class} ({} units)\n", planned.len());
                for unit in &planned {
                    output.push_str(&format!("  {:32} [{}]\n", unit.method, unit.scenario));
                }
                output
            }
        }
    }

    /// Format resolved suites
    pub fn format_suites(&self, suites: &[Suite]) -> String {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonPretty => self.json(suites),
            OutputFormat::Csv => {
                let mut output = String::from("suite,class\n");
                for suite in suites {
                    for member in suite.members() {
                        output.push_str(&format!("{},{}\n", csv_field(suite.name()), csv_field(member)));
                    }
                }
                output
            }
            OutputFormat::Summary => suites
                .iter()
                .map(|s| format!("{}: {} member(s)", s.name(), s.len()))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Table => {
                let mut output = String::new();
                for suite in suites {
                    output.push_str(&format!("\n{} ({} members)\n", suite.name(), suite.len()));
                    for member in suite.members() {
                        output.push_str(&format!("  - {member}\n"));
                    }
                }
                output
            }
        }
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn format_result_csv(result: &TestResult) -> String {
    format!(
        "{},{},{},{},{},{}",
        csv_field(&result.class),
        csv_field(&result.method),
        csv_field(&result.scenario),
        result.status,
        result.duration_ms,
        csv_field(result.message.as_deref().unwrap_or(""))
    )
}

fn format_summary_csv(summary: &RunSummary) -> String {
    let mut output = String::from("class,method,scenario,status,duration_ms,message\n");
    for class in &summary.classes {
        if let Some(error) = &class.error {
            output.push_str(&format!(
                "{},,,{},0,{}\n",
                csv_field(&class.class),
                TestStatus::Error,
                csv_field(error)
            ));
        }
        for result in &class.results {
            output.push_str(&format_result_csv(result));
            output.push('\n');
        }
    }
    output
}
