//! Sweep report

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config::CheckConfig;
use crate::finding::{Finding, FindingKind, Findings};

/// Result of [`crate::run_sweep`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// First swept ratio
    pub ratio_from: u32,
    /// Last swept ratio (inclusive)
    pub ratio_to: u32,
    /// Distance between swept ratios
    pub ratio_step: u32,
    /// Positions checked per ratio
    pub positions: u32,
    /// Number of ratios checked
    pub ratios_checked: usize,
    /// Number of (ratio, position) pairs checked
    pub positions_checked: u64,
    /// Findings per kind, including those not kept in detail
    pub counts: BTreeMap<FindingKind, usize>,
    /// Some findings were counted but not kept
    pub truncated: bool,
    /// Findings kept in detail, in ratio order
    pub findings: Vec<Finding>,
}

impl SweepReport {
    pub(crate) fn new(config: &CheckConfig, ratios_checked: usize, findings: Findings) -> Self {
        let truncated = findings.truncated();
        let (findings, counts) = findings.into_parts();
        Self {
            ratio_from: config.ratio_from,
            ratio_to: config.ratio_to,
            ratio_step: config.ratio_step,
            positions: config.positions,
            ratios_checked,
            positions_checked: ratios_checked as u64 * u64::from(config.positions),
            counts,
            truncated,
            findings,
        }
    }

    /// Total number of findings
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of findings of one kind
    pub fn count(&self, kind: FindingKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Whether the sweep found nothing
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// First finding of a kind, if kept
    pub fn first(&self, kind: FindingKind) -> Option<&Finding> {
        self.findings.iter().find(|f| f.kind() == kind)
    }

    /// Render the report as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Sweep ratios {:#06X}..={:#06X} step {}, {} positions each",
            self.ratio_from, self.ratio_to, self.ratio_step, self.positions
        )?;
        writeln!(
            f,
            "Checked {} ratios, {} positions",
            self.ratios_checked, self.positions_checked
        )?;

        if self.is_clean() {
            return writeln!(f, "No findings");
        }

        writeln!(f, "Findings: {}", self.total())?;
        for (kind, count) in &self.counts {
            writeln!(f, "  {:<26} {}", kind.name(), count)?;
        }

        writeln!(f)?;
        for finding in &self.findings {
            writeln!(f, "  {}", finding)?;
        }
        if self.truncated {
            writeln!(
                f,
                "  ... {} more not listed",
                self.total() - self.findings.len()
            )?;
        }
        Ok(())
    }
}
