//! Results storage and retrieval
//!
//! Saved runs live as pretty JSON under `<base>/<target>/<run id>.json`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{RunSummary, TestStatus};

/// A finished run: every round plus aggregate statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRun {
    /// Unique run ID
    pub id: String,

    /// Class, suite or profile that was run
    pub target: String,

    pub started_at: DateTime<Utc>,

    pub completed_at: DateTime<Utc>,

    /// Whether classes ran in parallel
    pub parallel: bool,

    /// Round summaries
    pub summaries: Vec<RunSummary>,

    /// Aggregate statistics
    pub aggregate: Option<AggregateStats>,

    pub environment: EnvironmentInfo,
}

/// Statistics across all rounds of a run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AggregateStats {
    pub avg_pass_rate: f64,
    pub min_pass_rate: f64,
    pub max_pass_rate: f64,
    pub avg_duration_ms: u64,
    pub total_duration_ms: u64,

    /// Per-unit statistics keyed by `Class::method[scenario]`
    pub units: BTreeMap<String, UnitRecord>,
}

/// Outcome counts of one unit across rounds
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UnitRecord {
    pub pass_count: u32,
    pub fail_count: u32,
    pub skip_count: u32,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
}

/// Environment information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub os: String,
    pub arch: String,
    pub tool_version: String,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl StoredRun {
    /// Start a new run record
    pub fn new(target: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_run_id(),
            target: target.into(),
            started_at: now,
            completed_at: now,
            parallel: false,
            summaries: Vec::new(),
            aggregate: None,
            environment: EnvironmentInfo::default(),
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn rounds(&self) -> usize {
        self.summaries.len()
    }

    /// Add a round summary
    pub fn add_round(&mut self, summary: RunSummary) {
        self.summaries.push(summary);
        self.completed_at = Utc::now();
    }

    /// Calculate aggregate statistics
    pub fn calculate_aggregate(&mut self) {
        if self.summaries.is_empty() {
            return;
        }

        let rounds = self.summaries.len();
        let pass_rates: Vec<f64> = self.summaries.iter().map(RunSummary::pass_rate).collect();
        let total_duration_ms: u64 = self.summaries.iter().map(|s| s.total_duration_ms).sum();

        let mut units: BTreeMap<String, UnitRecord> = BTreeMap::new();
        for result in self.summaries.iter().flat_map(RunSummary::results) {
            let record = units.entry(result.id()).or_insert_with(|| UnitRecord {
                min_duration_ms: u64::MAX,
                ..UnitRecord::default()
            });
            match result.status {
                TestStatus::Pass => record.pass_count += 1,
                TestStatus::Skip => record.skip_count += 1,
                TestStatus::Fail | TestStatus::Error => record.fail_count += 1,
            }
            record.min_duration_ms = record.min_duration_ms.min(result.duration_ms);
            record.max_duration_ms = record.max_duration_ms.max(result.duration_ms);
        }

        self.aggregate = Some(AggregateStats {
            avg_pass_rate: pass_rates.iter().sum::<f64>() / rounds as f64,
            min_pass_rate: pass_rates.iter().cloned().fold(f64::INFINITY, f64::min),
            max_pass_rate: pass_rates.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            avg_duration_ms: total_duration_ms / rounds as u64,
            total_duration_ms,
            units,
        });
    }

    /// Whether any round had a failure or error
    pub fn has_failures(&self) -> bool {
        self.summaries.iter().any(RunSummary::has_failures)
    }
}

/// Generate unique run ID
fn generate_run_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let random: u32 = rand::random::<u32>() % 10000;
    format!("{timestamp}_{random:04}")
}

/// Directory-safe name for a target such as `samples::ExampleSuite`
fn target_dir_name(target: &str) -> String {
    target
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect::<String>()
        .to_lowercase()
}

/// Results storage manager
pub struct ResultsStorage {
    base_dir: PathBuf,
}

impl ResultsStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Storage under the platform data directory
    pub fn default_dir() -> Self {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scenario-runner")
            .join("results");
        Self::new(base_dir)
    }

    /// Storage at `dir` if given, else the platform default
    pub fn at(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::new(dir),
            None => Self::default_dir(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn target_dir(&self, target: &str) -> PathBuf {
        self.base_dir.join(target_dir_name(target))
    }

    fn run_path(&self, target: &str, run_id: &str) -> PathBuf {
        self.target_dir(target).join(format!("{run_id}.json"))
    }

    /// Save a run
    pub fn save(&self, run: &StoredRun) -> Result<PathBuf> {
        let target_dir = self.target_dir(&run.target);
        fs::create_dir_all(&target_dir)
            .with_context(|| format!("Failed to create {}", target_dir.display()))?;

        let path = self.run_path(&run.target, &run.id);
        let file = File::create(&path).context("Failed to create results file")?;
        serde_json::to_writer_pretty(BufWriter::new(file), run)
            .context("Failed to write results")?;

        info!("Saved results to {}", path.display());
        Ok(path)
    }

    /// Load a run
    pub fn load(&self, target: &str, run_id: &str) -> Result<StoredRun> {
        let path = self.run_path(target, run_id);
        let run = self.load_from_path(&path)?;
        debug!("Loaded results from {}", path.display());
        Ok(run)
    }

    /// Load from a specific path
    pub fn load_from_path(&self, path: &Path) -> Result<StoredRun> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open results file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file)).context("Failed to parse results")
    }

    /// All runs for a target, newest first; unreadable files are skipped
    pub fn load_target(&self, target: &str) -> Result<Vec<StoredRun>> {
        let mut runs = self.load_dir(&self.target_dir(target))?;
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }

    fn load_dir(&self, dir: &Path) -> Result<Vec<StoredRun>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match self.load_from_path(&path) {
                    Ok(run) => runs.push(run),
                    Err(e) => debug!("Failed to load {}: {}", path.display(), e),
                }
            }
        }
        Ok(runs)
    }

    /// Directory names of every target with saved runs
    pub fn list_targets(&self) -> Result<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut targets = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    targets.push(name.to_string());
                }
            }
        }

        targets.sort();
        Ok(targets)
    }

    /// Brief info on every saved run, newest first
    pub fn list_runs(&self) -> Result<Vec<RunInfo>> {
        let mut runs = Vec::new();
        for dir in self.list_targets()? {
            for run in self.load_dir(&self.base_dir.join(dir))? {
                runs.push(RunInfo::from(&run));
            }
        }
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }

    /// Most recent run across all targets, or for one target
    pub fn latest(&self, target: Option<&str>) -> Result<Option<StoredRun>> {
        let mut runs = match target {
            Some(target) => self.load_target(target)?,
            None => {
                let mut all = Vec::new();
                for dir in self.list_targets()? {
                    all.extend(self.load_dir(&self.base_dir.join(dir))?);
                }
                all
            }
        };
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs.into_iter().next())
    }

    /// Delete a run
    pub fn delete(&self, target: &str, run_id: &str) -> Result<()> {
        let path = self.run_path(target, run_id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Deleted results: {}", path.display());
        }
        Ok(())
    }

    /// Export a run as JSON or as one CSV row per unit per round
    pub fn export(&self, run: &StoredRun, path: &Path, format: ExportFormat) -> Result<()> {
        match format {
            ExportFormat::Json => {
                let file = File::create(path)?;
                serde_json::to_writer_pretty(BufWriter::new(file), run)?;
            }
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_path(path)?;
                writer.write_record([
                    "round",
                    "class",
                    "method",
                    "scenario",
                    "status",
                    "duration_ms",
                    "message",
                ])?;

                for summary in &run.summaries {
                    for class in &summary.classes {
                        if let Some(error) = &class.error {
                            writer.write_record([
                                summary.round.to_string(),
                                class.class.clone(),
                                String::new(),
                                String::new(),
                                TestStatus::Error.to_string(),
                                "0".to_string(),
                                error.clone(),
                            ])?;
                        }
                        for result in &class.results {
                            writer.write_record([
                                summary.round.to_string(),
                                result.class.clone(),
                                result.method.clone(),
                                result.scenario.clone(),
                                result.status.to_string(),
                                result.duration_ms.to_string(),
                                result.message.clone().unwrap_or_default(),
                            ])?;
                        }
                    }
                }
                writer.flush()?;
            }
        }

        info!("Exported results to {}", path.display());
        Ok(())
    }
}

/// Brief run information
#[derive(Clone, Debug)]
pub struct RunInfo {
    pub id: String,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub rounds: usize,
    pub pass_rate: f64,
}

impl From<&StoredRun> for RunInfo {
    fn from(run: &StoredRun) -> Self {
        Self {
            id: run.id.clone(),
            target: run.target.clone(),
            started_at: run.started_at,
            rounds: run.rounds(),
            pass_rate: run
                .aggregate
                .as_ref()
                .map(|a| a.avg_pass_rate)
                .unwrap_or(0.0),
        }
    }
}

/// Export format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::parse)
    }
}
