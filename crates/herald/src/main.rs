mod logging;
mod scenario;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info, warn};

use crate::scenario::{DispatchReport, Scenario};

/// Herald: priority-ordered, synchronous event dispatch
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Simple ping command for testing
    #[arg(long)]
    ping: bool,

    /// Log level or env-filter directive (overridden by HERALD_LOG)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a scenario's listeners and run its dispatches
    Run {
        /// Scenario file (.json, .yaml, .yml or .toml)
        scenario: PathBuf,
    },
    /// Validate a scenario and print the resulting registry
    Check {
        /// Scenario file (.json, .yaml, .yml or .toml)
        scenario: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Handle simple ping command
    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    if let Err(e) = logging::init(&args.log_level, args.json_logs) {
        eprintln!("Warning: {}", e);
    }

    let Some(command) = args.command else {
        println!("Nothing to do. Try 'herald run <SCENARIO>' or 'herald --help'.");
        return ExitCode::SUCCESS;
    };

    match command {
        Commands::Run { scenario } => run_scenario(&scenario),
        Commands::Check { scenario } => check_scenario(&scenario),
    }
}

fn load(path: &Path) -> Option<Scenario> {
    match Scenario::load(path) {
        Ok(scenario) => Some(scenario),
        Err(e) => {
            error!("Failed to load scenario {}: {}", path.display(), e);
            eprintln!("Error loading scenario '{}': {}", path.display(), e);
            None
        }
    }
}

fn run_scenario(path: &Path) -> ExitCode {
    let Some(scenario) = load(path) else {
        return ExitCode::FAILURE;
    };
    if scenario.dispatches.is_empty() {
        warn!("Scenario {} contains no dispatches", path.display());
    }

    for report in scenario.run() {
        print_report(&report);
    }
    info!("Scenario {} finished", path.display());
    ExitCode::SUCCESS
}

fn print_report(report: &DispatchReport) {
    for invocation in &report.invocations {
        println!(
            "{} -> {} (priority {})",
            invocation.event, invocation.listener, invocation.priority
        );
    }
    let stopped = if report.outcome.stopped {
        ", propagation stopped"
    } else {
        ""
    };
    println!(
        "dispatched '{}': {} listener(s) invoked{}",
        report.event, report.outcome.invoked, stopped
    );
}

fn check_scenario(path: &Path) -> ExitCode {
    let Some(scenario) = load(path) else {
        return ExitCode::FAILURE;
    };

    let (dispatcher, _, missed) = scenario.build();
    for miss in &missed {
        println!(
            "warning: removal #{} of '{}' from '{}' at priority {} matched nothing",
            miss.index, miss.spec.name, miss.spec.event, miss.spec.priority
        );
    }

    let names = dispatcher.event_names();
    if names.is_empty() {
        println!("No listeners registered.");
    }
    for name in names {
        let priorities: Vec<String> = dispatcher
            .priorities(name.as_str())
            .iter()
            .map(|p| p.to_string())
            .collect();
        println!(
            "{}: priorities [{}], {} listener(s)",
            name,
            priorities.join(", "),
            dispatcher.listener_count(name.as_str())
        );
    }
    println!("Scenario OK ({} dispatch(es))", scenario.dispatches.len());
    ExitCode::SUCCESS
}
