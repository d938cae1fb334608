//! Prefilter multiplier selection
//!
//! Large downscale ratios are split between a prefilter that reduces by a
//! power of two and the polyphase filter proper. The prefilter factor
//! `mp` (m' in the hardware manual) only depends on the integer part of the
//! ratio. This model assumes the BLADV bit is always clear; setting it
//! would change the thresholds.

use crate::ratio::RATIO_FRACTION_BITS;

/// Valid prefilter multipliers, smallest first
pub const MULTIPLIERS: [u32; 3] = [1, 2, 4];

/// Select the prefilter multiplier for a ratio
///
/// | Integer part of ratio | mp |
/// |---|---|
/// | 0 to 3 | 1 |
/// | 4 to 7 | 2 |
/// | 8 and above | 4 |
///
/// Ratios of 12:1 and above are outside the hardware's range but still map
/// to 4. The function is total and never returns zero.
pub fn multiplier(ratio: u32) -> u32 {
    match ratio >> RATIO_FRACTION_BITS {
        0..=3 => 1,
        4..=7 => 2,
        _ => 4,
    }
}

/// Check that a value is a multiple of the prefilter multiplier
///
/// This is the alignment restriction on `dst_pos * alpha`: any value for
/// `mp == 1`, even values for `mp == 2`, multiples of four for `mp == 4`.
/// A zero multiplier aligns nothing and returns `false`.
pub fn is_mp_aligned(value: u64, mp: u32) -> bool {
    mp != 0 && value % u64::from(mp) == 0
}
