//! Phase traces and single-position inspection

use std::fmt;

use serde::Serialize;
use udsphase_core::{
    PhaseResult, PullbackCheck, PullbackFormula, compute_ratio, format_ratio, left_pixel,
    phase_calculation, pullback_check, residual, residual_offset_with, right_pixel, start_phase,
};

use crate::config::TraceConfig;
use crate::error::CheckResult;

// ============================================================================
// Trace
// ============================================================================

/// Phase decomposition of consecutive destination positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseTrace {
    pub ratio: u32,
    pub start_phase: u32,
    /// `(position, phase)` for positions `0..count`
    pub entries: Vec<(u32, PhaseResult)>,
}

/// Trace the phase decomposition of positions `0..count`
pub fn phase_trace(ratio: u32, start_phase: u32, count: u32) -> CheckResult<PhaseTrace> {
    let entries = (0..count)
        .map(|pos| Ok((pos, phase_calculation(pos, start_phase, ratio)?)))
        .collect::<CheckResult<Vec<_>>>()?;
    Ok(PhaseTrace {
        ratio,
        start_phase,
        entries,
    })
}

/// Trace the configured size pair
pub fn phase_trace_for(config: &TraceConfig) -> CheckResult<PhaseTrace> {
    let ratio = compute_ratio(config.pair.input, config.pair.output, config.formula)?;
    log::debug!(
        "tracing {} -> {} ({}): ratio {}",
        config.pair.input,
        config.pair.output,
        config.formula,
        ratio
    );
    phase_trace(ratio, config.start_phase, config.count)
}

impl PhaseTrace {
    /// Render the trace as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for PhaseTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, phase) in &self.entries {
            writeln!(f, "P:{:3} ratio {} {}", pos, self.ratio, phase)?;
        }
        Ok(())
    }
}

// ============================================================================
// Inspection
// ============================================================================

/// Shortcut formula values for one position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShortcutValues {
    pub residual: u32,
    pub left: u32,
    pub right: u32,
    pub start_phase: u32,
}

/// Everything the model says about one (position, ratio)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub position: u32,
    pub ratio: u32,
    pub phase: PhaseResult,
    pub shortcuts: ShortcutValues,
    pub pullback: PullbackCheck,
    pub offset_congruence: u32,
    pub offset_datasheet: u32,
}

impl Inspection {
    /// Whether the shortcut formulas agree with the phase calculation
    pub fn shortcuts_agree(&self) -> bool {
        self.shortcuts.residual == self.phase.residual
            && self.shortcuts.left == self.phase.left
            && self.shortcuts.right == self.phase.right
            && self.shortcuts.start_phase == self.phase.start_phase()
    }
}

/// Inspect one destination position at one ratio
pub fn inspect(position: u32, ratio: u32) -> CheckResult<Inspection> {
    Ok(Inspection {
        position,
        ratio,
        phase: phase_calculation(position, 0, ratio)?,
        shortcuts: ShortcutValues {
            residual: residual(position, ratio)?,
            left: left_pixel(position, ratio)?,
            right: right_pixel(position, ratio)?,
            start_phase: start_phase(position, ratio)?,
        },
        pullback: pullback_check(position, ratio)?,
        offset_congruence: residual_offset_with(position, ratio, PullbackFormula::Congruence),
        offset_datasheet: residual_offset_with(position, ratio, PullbackFormula::Datasheet),
    })
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = &self.phase;
        writeln!(f, "Ratio : {} ({})", self.ratio, format_ratio(self.ratio))?;
        writeln!(f, "P:{:3} ratio {} {}", self.position, self.ratio, phase)?;
        writeln!(
            f,
            "  start phase {} alignment {}",
            phase.start_phase(),
            if phase.alignment_violation() {
                "VIOLATED"
            } else {
                "ok"
            }
        )?;
        writeln!(
            f,
            "  shortcut residual {} left {} right {} start phase {}{}",
            self.shortcuts.residual,
            self.shortcuts.left,
            self.shortcuts.right,
            self.shortcuts.start_phase,
            if self.shortcuts_agree() {
                ""
            } else {
                " (disagrees)"
            }
        )?;
        writeln!(
            f,
            "  pullback required {} (residual {}, offset {}): shift {} (datasheet {})",
            self.pullback.required(),
            self.pullback.by_residual,
            self.pullback.by_offset,
            self.offset_congruence,
            self.offset_datasheet
        )
    }
}
