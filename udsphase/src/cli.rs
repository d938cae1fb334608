//! CLI argument definitions using Clap v4
//!
//! Flags override the values of the configuration file given with
//! `--config`, which in turn override the built-in defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use udsphase::RatioFormula;
use udsphase::check::CheckConfig;

/// udsphase - UDS polyphase scaler phase arithmetic explorer
#[derive(Parser, Debug)]
#[command(name = "udsphase")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the ratio table of the configured size pairs
    Ratios,

    /// Trace the phase decomposition of consecutive positions
    #[command(alias = "t")]
    Trace(TraceArgs),

    /// Cross-check the arithmetic over a ratio range
    ///
    /// Exits with status 1 when anything was found.
    #[command(alias = "s")]
    Sweep(SweepArgs),

    /// Inspect one destination position at one ratio
    #[command(alias = "c")]
    Check(CheckArgs),
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Ratio formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum FormulaArg {
    /// (input - 1) * 4096 / (output - 1)
    Clamped,
    /// input * 4096 / output
    Naive,
}

impl From<FormulaArg> for RatioFormula {
    fn from(arg: FormulaArg) -> Self {
        match arg {
            FormulaArg::Clamped => RatioFormula::Clamped,
            FormulaArg::Naive => RatioFormula::Naive,
        }
    }
}

/// Arguments for the trace command
#[derive(Args, Debug, Default)]
pub struct TraceArgs {
    /// Input size in pixels
    #[arg(long)]
    pub input: Option<u32>,

    /// Output size in pixels
    #[arg(long)]
    pub output: Option<u32>,

    /// Formula deriving the ratio from the sizes
    #[arg(long, value_enum)]
    pub formula: Option<FormulaArg>,

    /// Number of positions to trace
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Start phase (results for non-zero values are unverified)
    #[arg(long)]
    pub start_phase: Option<u32>,
}

impl TraceArgs {
    /// Override the trace settings of a configuration
    pub fn apply(&self, config: &mut CheckConfig) {
        let trace = &mut config.trace;
        if let Some(input) = self.input {
            trace.pair.input = input;
        }
        if let Some(output) = self.output {
            trace.pair.output = output;
        }
        if let Some(formula) = self.formula {
            trace.formula = formula.into();
        }
        if let Some(count) = self.count {
            trace.count = count;
        }
        if let Some(start_phase) = self.start_phase {
            trace.start_phase = start_phase;
        }
    }
}

/// Arguments for the sweep command
#[derive(Args, Debug, Default)]
pub struct SweepArgs {
    /// First ratio (decimal or 0x hex)
    #[arg(long, value_parser = parse_ratio)]
    pub from: Option<u32>,

    /// Last ratio, inclusive (decimal or 0x hex)
    #[arg(long, value_parser = parse_ratio)]
    pub to: Option<u32>,

    /// Distance between swept ratios
    #[arg(long)]
    pub step: Option<u32>,

    /// Destination positions checked per ratio
    #[arg(short, long)]
    pub positions: Option<u32>,

    /// Findings listed in detail (0 lists none, all are still counted)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// List every finding
    #[arg(long, conflicts_with = "limit")]
    pub no_limit: bool,

    /// Worker threads
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

impl SweepArgs {
    /// Override the sweep settings of a configuration
    pub fn apply(&self, config: &mut CheckConfig) {
        if let Some(from) = self.from {
            config.ratio_from = from;
        }
        if let Some(to) = self.to {
            config.ratio_to = to;
        }
        if let Some(step) = self.step {
            config.ratio_step = step;
        }
        if let Some(positions) = self.positions {
            config.positions = positions;
        }
        if self.no_limit {
            config.max_findings = None;
        } else if let Some(limit) = self.limit {
            config.max_findings = Some(limit);
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
    }
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Destination position
    #[arg(long)]
    pub pos: u32,

    /// U4.12 ratio (decimal or 0x hex)
    #[arg(long, value_parser = parse_ratio)]
    pub ratio: u32,
}

/// Parse a ratio given in decimal or with a `0x` prefix in hex
pub fn parse_ratio(value: &str) -> Result<u32, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid ratio '{}': {}", value, e))
}
