//! Output size prediction
//!
//! Inverse of the ratio formulas: given an input size and the programmed
//! ratio, the number of pixels the scaler will emit. When downscaling the
//! prefilter consumes input in groups of `mp`, so the last partial group is
//! dropped before the ratio is applied.

use crate::error::{UdsError, UdsResult};
use crate::multiplier::multiplier;
use crate::ratio::RATIO_ONE;

/// Output size for an input size and U4.12 ratio
///
/// - Downscaling (`ratio > 4096`): `(input - 1) / mp * mp * 4096 / ratio + 1`
/// - Upscaling or identity: `(input - 1) * 4096 / ratio + 1`
///
/// # Errors
/// [`UdsError::InvalidArgument`] for `input == 0` or `ratio == 0`,
/// [`UdsError::Overflow`] when the 32-bit product overflows.
pub fn output_size(input: u32, ratio: u32) -> UdsResult<u32> {
    if input == 0 {
        return Err(UdsError::invalid("input", input, "input size must be at least 1"));
    }
    if ratio == 0 {
        return Err(UdsError::invalid("ratio", ratio, "ratio must be non-zero"));
    }

    let span = if ratio > RATIO_ONE {
        let mp = multiplier(ratio);
        (input - 1) / mp * mp
    } else {
        input - 1
    };

    let scaled = span
        .checked_mul(RATIO_ONE)
        .ok_or_else(|| UdsError::overflow("output_size"))?;
    Ok(scaled / ratio + 1)
}
