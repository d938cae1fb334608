//! udsphase CLI - Explore and validate the UDS phase arithmetic

mod cli;

use std::fmt::Display;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use udsphase::check::{CheckConfig, CheckResult, inspect, phase_trace_for, ratio_table, run_sweep};

use crate::cli::{Cli, Commands, OutputFormat};

/// Print a report in the requested format
fn emit<T: Display + Serialize>(report: &T, format: OutputFormat) -> CheckResult<()> {
    match format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

fn load_config(cli: &Cli) -> CheckResult<CheckConfig> {
    match &cli.config {
        Some(path) => {
            log::info!("loading configuration from {}", path.display());
            CheckConfig::from_json_file(path)
        }
        None => Ok(CheckConfig::default()),
    }
}

/// Run the selected command, returning whether it found problems
fn run(cli: &Cli) -> CheckResult<bool> {
    let mut config = load_config(cli)?;

    match &cli.command {
        Commands::Ratios => {
            emit(&ratio_table(&config), cli.format)?;
            Ok(false)
        }
        Commands::Trace(args) => {
            args.apply(&mut config);
            emit(&phase_trace_for(&config.trace)?, cli.format)?;
            Ok(false)
        }
        Commands::Sweep(args) => {
            args.apply(&mut config);
            let report = run_sweep(&config)?;
            emit(&report, cli.format)?;
            Ok(!report.is_clean())
        }
        Commands::Check(args) => {
            emit(&inspect(args.pos, args.ratio)?, cli.format)?;
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
