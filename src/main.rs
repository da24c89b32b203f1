//! scenario-runner binary
//!
//! Runs the built-in sample catalog.
//!
//! ```bash
//! # Run everything
//! scenario-runner run
//!
//! # Run a suite and a class for 5 rounds in parallel
//! scenario-runner run samples::Calculator --suite samples::ExampleSuite --rounds 5 --parallel
//!
//! # List classes with their methods and scenarios
//! scenario-runner list --detailed --suites
//!
//! # Show the latest saved run
//! scenario-runner results --latest
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use scenario_runner::cli::{self, Args};
use scenario_runner::config::{self, AppConfig, ConfigFile, EnvConfig, ProfileManager};
use scenario_runner::discovery::scenarios::scenarios_of;
use scenario_runner::executor::{BatchRunner, TestRunner};
use scenario_runner::output::{OutputFormat, ResultFormatter};
use scenario_runner::registry::Catalog;
use scenario_runner::results::{ExportFormat, ResultsStorage, StoredRun};
use scenario_runner::suite::members_of;
use scenario_runner::utils::{init_logger, LogLevel};
use scenario_runner::{discovery, samples};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env = EnvConfig::load();
    let config_path = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(PathBuf::from));
    let config_file = ConfigFile::load_or_default(config_path.as_deref())?;
    let app = config_file.app.clone().with_env(&env);

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        app.log_level()
    };
    init_logger(level);

    let catalog = Arc::new(samples::catalog()?);

    match args.command {
        cli::Command::Run(run_args) => {
            let mut profiles = ProfileManager::new();
            for profile in config_file.profiles.iter().cloned() {
                profiles.add(profile);
            }
            run_targets(run_args, &app, &profiles, catalog).await?;
        }
        cli::Command::List(list_args) => {
            list_classes(list_args, &catalog)?;
        }
        cli::Command::Plan(plan_args) => {
            show_plan(plan_args, catalog)?;
        }
        cli::Command::Results(results_args) => {
            show_results(results_args, &app)?;
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, config_file, &env, &catalog)?;
        }
    }

    Ok(())
}

fn formatter_for(format: &str, color: bool) -> Result<ResultFormatter> {
    let format = OutputFormat::parse(format)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {format}"))?;
    let formatter = ResultFormatter::new(format);
    Ok(if color { formatter } else { formatter.no_color() })
}

async fn run_targets(
    args: cli::RunArgs,
    app: &AppConfig,
    profiles: &ProfileManager,
    catalog: Arc<Catalog>,
) -> Result<()> {
    let profile = match &args.profile {
        Some(name) => Some(
            profiles
                .get(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown profile: {name}"))?,
        ),
        None => None,
    };

    let mut targets: Vec<String> = args.targets.iter().chain(&args.suite).cloned().collect();
    if let Some(profile) = profile {
        targets.extend(profile.targets.iter().cloned());
    }
    if targets.is_empty() {
        targets = catalog
            .classes()
            .filter(|c| !c.is_abstract())
            .map(|c| c.name.clone())
            .collect();
    }

    let rounds = args
        .rounds
        .or(profile.map(|p| p.rounds))
        .unwrap_or(app.rounds)
        .max(1);
    let parallel = args.parallel || profile.map(|p| p.parallel).unwrap_or(app.parallel);
    let concurrent = args.concurrent.unwrap_or(app.max_concurrent);
    let formatter = formatter_for(
        args.format.as_deref().unwrap_or(&app.format),
        app.color && !args.no_color,
    )?;

    let runner = TestRunner::new(catalog);
    let resolved = runner.resolve_targets(&targets)?;
    let label = profile
        .map(|p| p.name.clone())
        .unwrap_or_else(|| resolved.name().to_string());

    info!(
        "Running {} class(es) for {} ({} rounds{})",
        resolved.len(),
        label,
        rounds,
        if parallel { ", parallel" } else { "" }
    );

    let summaries = if parallel {
        BatchRunner::new(runner, concurrent, rounds)
            .run_rounds(&label, resolved.members())
            .await
    } else {
        runner.run_rounds(rounds, &label, resolved.members())
    };

    for summary in &summaries {
        println!("{}", formatter.format_summary(summary));
    }
    if summaries.len() > 1 {
        let aggregate = BatchRunner::aggregate_results(&summaries);
        println!("{}", formatter.format_aggregate(&aggregate, &label));
    }

    let failed_rounds = summaries.iter().filter(|s| s.has_failures()).count();

    if args.save {
        let mut run = StoredRun::new(&label).with_parallel(parallel);
        for summary in summaries {
            run.add_round(summary);
        }
        run.calculate_aggregate();

        let path = ResultsStorage::at(app.results_dir.as_deref()).save(&run)?;
        println!("✓ Results saved to {}", path.display());
    }

    if failed_rounds > 0 {
        anyhow::bail!("{failed_rounds} of {rounds} round(s) had failures");
    }
    Ok(())
}

fn list_classes(args: cli::ListArgs, catalog: &Catalog) -> Result<()> {
    println!("\nRegistered Test Classes ({} total)\n", catalog.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for class in catalog.classes() {
        let kind = if class.is_abstract() { " (abstract)" } else { "" };
        println!("  {}{}", class.name, kind);

        if !args.detailed {
            continue;
        }
        if let Some(parent) = &class.parent {
            println!("      extends  {parent}");
        }
        for nested in &class.nested {
            println!("      nests    {nested}");
        }
        for method in class.methods.iter().filter(|m| m.is_test) {
            println!("      test     {} [{}]", method.name, method.visibility);
        }
        if class.has_scenarios() {
            match scenarios_of(class) {
                Ok(scenarios) => {
                    let mut labels: Vec<_> = scenarios.iter().map(|s| s.label().to_string()).collect();
                    labels.sort();
                    println!("      scenarios {}", labels.join(", "));
                }
                Err(e) => println!("      scenarios unavailable: {e}"),
            }
        }
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    if args.suites {
        let suites = catalog
            .suites()
            .map(|suite| members_of(catalog, suite))
            .collect::<Result<Vec<_>, _>>()?;
        println!("Suites:");
        println!("{}", ResultFormatter::new(OutputFormat::Table).format_suites(&suites));
    }

    Ok(())
}

fn show_plan(args: cli::PlanArgs, catalog: Arc<Catalog>) -> Result<()> {
    let formatter = formatter_for(&args.format, true)?;
    let class = catalog.require(&args.class)?;
    let units = discovery::discover(class)
        .with_context(|| format!("Cannot plan {}", args.class))?;

    println!("{}", formatter.format_plan(&args.class, &units));
    Ok(())
}

fn show_results(args: cli::ResultsArgs, app: &AppConfig) -> Result<()> {
    let storage = ResultsStorage::at(app.results_dir.as_deref());
    let formatter = formatter_for(&args.format, app.color)?;

    if args.latest || args.export.is_some() {
        let Some(run) = storage.latest(args.target.as_deref())? else {
            println!("\n📭 No stored results found in {}", storage.base_dir().display());
            return Ok(());
        };

        if args.latest {
            println!("Run {} | {} | started {}", run.id, run.target, run.started_at);
            for summary in &run.summaries {
                println!("{}", formatter.format_summary(summary));
            }
        }

        if let Some(path) = &args.export {
            let format = ExportFormat::from_extension(path).unwrap_or(ExportFormat::Json);
            storage.export(&run, path, format)?;
            println!("✓ Run {} exported to: {}", run.id, path.display());
        }
        return Ok(());
    }

    let runs: Vec<_> = storage
        .list_runs()?
        .into_iter()
        .filter(|r| args.target.as_deref().map_or(true, |t| r.target == t))
        .collect();

    if runs.is_empty() {
        println!("\n📭 No stored results found.");
        println!("   Save a run with: scenario-runner run <TARGETS> --save");
        return Ok(());
    }

    println!("\n{:22} {:32} {:>6} {:>8}", "Run", "Target", "Rounds", "Pass");
    println!("{:-<72}", "");
    for run in runs {
        println!(
            "{:22} {:32} {:>6} {:>7.1}%",
            run.id, run.target, run.rounds, run.pass_rate
        );
    }
    println!("\nUse --latest to view the most recent run in full.\n");

    Ok(())
}

fn manage_config(
    args: cli::ConfigArgs,
    config_file: ConfigFile,
    env: &EnvConfig,
    catalog: &Catalog,
) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }

            ConfigFile::example().save(&path)?;
            println!("✓ Configuration file created: {}", path.display());
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show => {
            let effective = ConfigFile {
                app: config_file.app.clone().with_env(env),
                ..config_file
            };
            println!("{}", serde_yaml::to_string(&effective)?);
        }

        cli::ConfigAction::Validate { path } => {
            let Some(path) = path.or_else(ConfigFile::find) else {
                anyhow::bail!("No configuration file found; pass a path or run `config init`");
            };
            validate_file(&path, catalog)?;
        }

        cli::ConfigAction::Env => {
            config::env::print_env_help();
            println!();
            env.print_summary();
        }
    }

    Ok(())
}

fn validate_file(path: &Path, catalog: &Catalog) -> Result<()> {
    let result = ConfigFile::load(path).and_then(|config| config.validate_targets(catalog));
    match result {
        Ok(()) => {
            println!("✓ Configuration file is valid: {}", path.display());
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration file is invalid: {}", path.display());
            println!("  Error: {e}");
            Err(e)
        }
    }
}
