//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scenario-aware test runner
#[derive(Parser, Debug)]
#[command(name = "scenario-runner")]
#[command(author = "hephaex@gmail.com")]
#[command(version)]
#[command(about = "Discover and run registered test classes, once per scenario")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run classes and suites
    Run(RunArgs),

    /// List registered classes and suites
    List(ListArgs),

    /// Show the execution units of a class without running them
    Plan(PlanArgs),

    /// View saved results
    Results(ResultsArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Classes or suites to run
    pub targets: Vec<String>,

    /// Suite to run (repeatable)
    #[arg(short, long)]
    pub suite: Vec<String>,

    /// Named profile supplying targets, rounds and parallelism
    #[arg(short = 'P', long)]
    pub profile: Option<String>,

    /// Run classes in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Maximum classes running at once (when parallel)
    #[arg(short, long)]
    pub concurrent: Option<usize>,

    /// Number of rounds
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Save the run to the results store
    #[arg(long)]
    pub save: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show methods, scenarios and hierarchy of each class
    #[arg(short, long)]
    pub detailed: bool,

    /// Show suites with their resolved members
    #[arg(short, long)]
    pub suites: bool,
}

/// Arguments for plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Fully qualified class name
    pub class: String,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Arguments for results command
#[derive(Parser, Debug)]
pub struct ResultsArgs {
    /// Show the most recent run in full
    #[arg(short, long)]
    pub latest: bool,

    /// Filter by target
    #[arg(short, long)]
    pub target: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Export the most recent run to a file (.json or .csv)
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Destination path
        #[arg(short, long, default_value = "scenario-runner.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Validate a configuration file and its profile targets
    Validate {
        /// File to validate (defaults to the standard locations)
        path: Option<PathBuf>,
    },

    /// Show supported environment variables and their current values
    Env,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["scenario-runner", "list", "--detailed"]);
        match args.command {
            Command::List(list_args) => {
                assert!(list_args.detailed);
                assert!(!list_args.suites);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_run_args() {
        let args = Args::parse_from([
            "scenario-runner",
            "run",
            "samples::Calculator",
            "--suite",
            "samples::ExampleSuite",
            "--rounds",
            "10",
            "--parallel",
            "--save",
        ]);
        match args.command {
            Command::Run(run_args) => {
                assert_eq!(run_args.targets, vec!["samples::Calculator"]);
                assert_eq!(run_args.suite, vec!["samples::ExampleSuite"]);
                assert_eq!(run_args.rounds, Some(10));
                assert!(run_args.parallel);
                assert!(run_args.save);
                assert!(run_args.format.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_plan_and_global_config() {
        let args = Args::parse_from([
            "scenario-runner",
            "plan",
            "samples::CurrencyConversion",
            "--config",
            "custom.yaml",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("custom.yaml")));
        match args.command {
            Command::Plan(plan) => {
                assert_eq!(plan.class, "samples::CurrencyConversion");
                assert_eq!(plan.format, "table");
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_config_init() {
        let args = Args::parse_from(["scenario-runner", "config", "init", "--force"]);
        match args.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { path, force },
            }) => {
                assert_eq!(path, PathBuf::from("scenario-runner.yaml"));
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }
}
