//! Phase and residual decomposition
//!
//! For a destination pixel `position` the scaler works on the scaled
//! coordinate `alpha = ratio * position` (U4.12). With a prefilter
//! multiplier `mp`, the prefilter emits one sample every `mp * 4096` units
//! of `alpha`; the quotient is the prefilter output position and the
//! remainder the residual phase. The source pixels the polyphase filter
//! reads for that destination pixel follow from those two values.
//!
//! [`phase_calculation`] is the reference decomposition. The free
//! functions [`residual`], [`left_pixel`], [`right_pixel`] and
//! [`start_phase`] are the shortcut formulas used elsewhere in the driver;
//! they scale `alpha` by `mp` before dividing and only agree with the
//! reference while `mp == 1`. The validation harness cross-checks both.
//!
//! # Alignment restriction
//!
//! When a partition window starts at `position`, the hardware requires
//! `position * alpha` to be a multiple of `mp`. Equivalently the residual
//! must be even for `mp == 2` and a multiple of four for `mp == 4`.
//! [`PhaseResult::alignment_violation`] reports a position breaking that
//! rule; see [`crate::pullback`] for moving it to a legal start.

use crate::error::{UdsError, UdsResult, narrow};
use crate::multiplier::{is_mp_aligned, multiplier};
use crate::ratio::RATIO_ONE;

// ============================================================================
// Types
// ============================================================================

/// Decomposition of one destination position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseResult {
    /// Prefilter multiplier
    pub mp: u32,
    /// `mp * 4096`, the prefilter step in U4.12 units
    pub prefilt_term: u32,
    /// Integer part of the scaled position, in prefilter samples
    pub prefilt_outpos: u32,
    /// Fractional remainder of the scaled position
    pub residual: u32,
    /// Edge phase adjustment, non-zero only when upscaling
    pub edge: u32,
    /// Leftmost source pixel read for this position
    pub left: u32,
    /// Rightmost source pixel read for this position
    pub right: u32,
}

impl PhaseResult {
    /// Whether the residual breaks the multiple-of-mp restriction
    pub fn alignment_violation(&self) -> bool {
        !is_mp_aligned(u64::from(self.residual), self.mp)
    }

    /// Start phase implied by the residual
    ///
    /// Zero for a position that lands exactly on a prefilter sample,
    /// otherwise the distance to the next sample in single-pixel units.
    pub fn start_phase(&self) -> u32 {
        if self.residual != 0 {
            RATIO_ONE - self.residual / self.mp
        } else {
            0
        }
    }
}

impl std::fmt::Display for PhaseResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mp:{} pt {} outpos {} residual {} edge {} src_left {} src_right {}",
            self.mp,
            self.prefilt_term,
            self.prefilt_outpos,
            self.residual,
            self.edge,
            self.left,
            self.right
        )
    }
}

// ============================================================================
// Reference decomposition
// ============================================================================

/// Edge phase for a ratio
///
/// Half the distance between the ratio and 1.0 when upscaling (the AMD
/// mode edge adjustment), zero otherwise.
pub fn phase_edge(ratio: u32) -> u32 {
    if ratio < RATIO_ONE {
        (RATIO_ONE - ratio) / 2
    } else {
        0
    }
}

/// Decompose a destination position into prefilter position and residual
///
/// # Arguments
/// * `position` - Destination pixel position
/// * `start_phase` - Phase subtracted from the scaled position, scaled by
///   `mp`. Always 0 in the driver; non-zero values are accepted but their
///   results have not been verified against hardware.
/// * `ratio` - U4.12 scaling ratio
///
/// # Errors
/// [`UdsError::InvalidArgument`] for a zero ratio or a start phase larger
/// than the scaled position, [`UdsError::Overflow`] when a pixel index
/// does not fit in 32 bits.
pub fn phase_calculation(position: u32, start_phase: u32, ratio: u32) -> UdsResult<PhaseResult> {
    if ratio == 0 {
        return Err(UdsError::invalid("ratio", ratio, "ratio must be non-zero"));
    }

    let mp = multiplier(ratio);
    let prefilt_term = mp * RATIO_ONE;

    let alpha = u64::from(ratio) * u64::from(position);
    let scaled = alpha
        .checked_sub(u64::from(start_phase) * u64::from(mp))
        .ok_or_else(|| {
            UdsError::invalid(
                "start_phase",
                start_phase,
                "start phase exceeds the scaled position",
            )
        })?;

    let term = u64::from(prefilt_term);
    let outpos = scaled / term;
    let residual = scaled % term;

    let mp64 = u64::from(mp);
    let left = mp64 * (outpos + u64::from(residual != 0));
    let right = mp64 * (outpos + 2) + mp64 / 2;

    Ok(PhaseResult {
        mp,
        prefilt_term,
        prefilt_outpos: narrow(outpos, "phase_calculation")?,
        residual: narrow(residual, "phase_calculation")?,
        edge: phase_edge(ratio),
        left: narrow(left, "phase_calculation")?,
        right: narrow(right, "phase_calculation")?,
    })
}

/// Left source pixel for a destination position
///
/// Same value as [`PhaseResult::left`]. Logs a warning when the position is
/// not a legal partition window start.
pub fn src_left_pixel(dstpos: u32, start_phase: u32, ratio: u32) -> UdsResult<u32> {
    let phase = phase_calculation(dstpos, start_phase, ratio)?;

    if phase.alignment_violation() {
        log::warn!(
            "dst_pos {} ratio {}: residual {} is not a multiple of mp {} ({})",
            dstpos,
            ratio,
            phase.residual,
            phase.mp,
            phase
        );
    }

    Ok(phase.left)
}

// ============================================================================
// Shortcut formulas
// ============================================================================

/// `(mp, quotient, remainder)` of `pos * ratio * mp` over `mp * 4096`
fn scaled_terms(pos: u32, ratio: u32, operation: &'static str) -> UdsResult<(u64, u64, u64)> {
    if ratio == 0 {
        return Err(UdsError::invalid("ratio", ratio, "ratio must be non-zero"));
    }

    let mp = u64::from(multiplier(ratio));
    let product = (u64::from(pos) * u64::from(ratio))
        .checked_mul(mp)
        .ok_or_else(|| UdsError::overflow(operation))?;
    let term = mp * u64::from(RATIO_ONE);

    Ok((mp, product / term, product % term))
}

/// Residual by the shortcut formula `(pos * ratio * mp) % (mp * 4096)`
pub fn residual(pos: u32, ratio: u32) -> UdsResult<u32> {
    let (_, _, rem) = scaled_terms(pos, ratio, "residual")?;
    narrow(rem, "residual")
}

/// Left source pixel by the shortcut formula
pub fn left_pixel(pos: u32, ratio: u32) -> UdsResult<u32> {
    let (mp, quot, rem) = scaled_terms(pos, ratio, "left_pixel")?;
    narrow(mp * (quot + u64::from(rem != 0)), "left_pixel")
}

/// Right source pixel by the shortcut formula
pub fn right_pixel(pos: u32, ratio: u32) -> UdsResult<u32> {
    let (mp, quot, _) = scaled_terms(pos, ratio, "right_pixel")?;
    narrow(mp * (quot + 2) + mp / 2, "right_pixel")
}

/// Start phase by the shortcut formula
pub fn start_phase(pos: u32, ratio: u32) -> UdsResult<u32> {
    let (mp, _, rem) = scaled_terms(pos, ratio, "start_phase")?;
    if rem == 0 {
        return Ok(0);
    }
    narrow(u64::from(RATIO_ONE) - rem / mp, "start_phase")
}
