//! Partition window pullback
//!
//! When an image is processed in partitions, each partition window starts
//! at a destination position `dst_pos0_pb`. The hardware manual restricts
//! that start: `dst_pos0_pb * alpha` must be a multiple of `mp` (no
//! restriction for `mp == 1`). A temporary start position that breaks the
//! rule is shifted left by `dst_pos0_pb_shift` pixels until it holds:
//!
//! ```text
//! dst_pos0_pb = dst_pos0_pb (temporal) - dst_pos0_pb_shift
//! ```
//!
//! [`residual_offset`] computes that shift. Two formulas are provided:
//!
//! - [`PullbackFormula::Datasheet`] projects the position through the
//!   prefilter and back: `n = pos * ratio / mp`, `a = mp * n / ratio`.
//!   It moves at most one pixel, which is not always enough for `mp == 4`.
//! - [`PullbackFormula::Congruence`] solves the restriction directly:
//!   aligned positions are the multiples of `mp / gcd(ratio, mp)`.
//!
//! [`residual_offset`] uses the congruence form, so applying it always
//! yields an aligned position. The harness compares both.

use crate::error::UdsResult;
use crate::multiplier::{is_mp_aligned, multiplier};
use crate::phase::phase_calculation;

// ============================================================================
// Types
// ============================================================================

/// Formula used to compute the pullback shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PullbackFormula {
    /// Projection through the prefilter grid and back
    Datasheet,
    /// Largest aligned position not above `pos`
    #[default]
    Congruence,
}

/// Both answers to "does this position need a pullback?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PullbackCheck {
    /// The residual of [`phase_calculation`] breaks the alignment rule
    pub by_residual: bool,
    /// [`residual_offset`] is non-zero
    pub by_offset: bool,
}

impl PullbackCheck {
    /// A pullback is needed if either test says so
    pub fn required(&self) -> bool {
        self.by_residual || self.by_offset
    }

    /// The two tests agree
    pub fn consistent(&self) -> bool {
        self.by_residual == self.by_offset
    }
}

// ============================================================================
// Offset computation
// ============================================================================

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Pullback shift with the given formula
///
/// Returns 0 when `mp == 1`.
pub fn residual_offset_with(pos: u32, ratio: u32, formula: PullbackFormula) -> u32 {
    let mp = multiplier(ratio);
    if mp == 1 {
        return 0;
    }

    let mp = u64::from(mp);
    let ratio = u64::from(ratio);
    let pos64 = u64::from(pos);

    let offset = match formula {
        PullbackFormula::Datasheet => {
            let n = pos64 * ratio / mp;
            pos64 - mp * n / ratio
        }
        PullbackFormula::Congruence => pos64 % (mp / gcd(ratio, mp)),
    };

    // Both formulas are bounded by pos
    offset as u32
}

/// Pullback shift for a destination position
///
/// Distance from `pos` down to the largest position `a <= pos` for which
/// `a * ratio` is a multiple of `mp`.
pub fn residual_offset(pos: u32, ratio: u32) -> u32 {
    residual_offset_with(pos, ratio, PullbackFormula::Congruence)
}

/// Position after applying the pullback shift
pub fn apply_pullback(pos: u32, ratio: u32) -> u32 {
    pos - residual_offset(pos, ratio)
}

/// Whether `pos * ratio` satisfies the alignment rule
pub fn is_aligned_position(pos: u32, ratio: u32) -> bool {
    is_mp_aligned(u64::from(pos) * u64::from(ratio), multiplier(ratio))
}

/// Run both pullback tests for a position
///
/// # Errors
/// Propagates the argument checks of [`phase_calculation`].
pub fn pullback_check(pos: u32, ratio: u32) -> UdsResult<PullbackCheck> {
    let phase = phase_calculation(pos, 0, ratio)?;
    Ok(PullbackCheck {
        by_residual: phase.alignment_violation(),
        by_offset: residual_offset(pos, ratio) != 0,
    })
}

/// Whether a position must be pulled back before starting a window
pub fn pullback_required(pos: u32, ratio: u32) -> UdsResult<bool> {
    Ok(pullback_check(pos, ratio)?.required())
}
