//! udsphase-check - Validation harness for the UDS phase model
//!
//! This crate exercises the arithmetic of `udsphase-core` over whole ranges
//! of ratios and positions:
//!
//! - Ratio tables for size pairs under each ratio formula ([`table`])
//! - Phase traces over consecutive positions ([`trace`])
//! - Cross-checks of shortcut formulas, pullback and multiplier ([`sweep`])
//! - Findings collected as values, bounded by a limit ([`finding`])
//! - Text and JSON reports ([`report`])
//!
//! A sweep never aborts on a failed check. Each one becomes a [`Finding`]
//! and the run continues.
//!
//! # Example
//!
//! ```
//! use udsphase_check::{CheckConfig, FindingKind, run_sweep};
//!
//! let config = CheckConfig::with_ratio_range(16384, 16400).positions(64);
//! let report = run_sweep(&config).unwrap();
//! assert!(report.count(FindingKind::AlignmentViolation) > 0);
//! assert_eq!(report.count(FindingKind::PullbackUnresolved), 0);
//! ```

pub mod config;
mod error;
pub mod finding;
pub mod report;
pub mod sweep;
pub mod table;
pub mod trace;

pub use config::{CheckConfig, DEFAULT_PAIRS, MAX_SWEEP_RATIO, SizePair, TraceConfig};
pub use error::{CheckError, CheckResult};
pub use finding::{Finding, FindingKind, Findings, Quantity};
pub use report::SweepReport;
pub use sweep::{check_multiplier, check_pullback, check_ratio, run_sweep};
pub use table::{RatioEntry, RatioRow, RatioStats, RatioTable, ratio_table};
pub use trace::{Inspection, PhaseTrace, ShortcutValues, inspect, phase_trace, phase_trace_for};
