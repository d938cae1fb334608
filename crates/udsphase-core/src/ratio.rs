//! Scaling ratio computation
//!
//! The scaler programs its ratio register as an unsigned U4.12 fixed-point
//! value: 12 fractional bits, so `4096` is a ratio of exactly 1.0. A ratio
//! below 4096 enlarges the image, a ratio above it shrinks the image.
//!
//! Two formulas are in use and both are kept:
//!
//! | Formula | Expression | Notes |
//! |---|---|---|
//! | [`RatioFormula::Clamped`] | `(input - 1) * 4096 / (output - 1)` | maps first and last pixels onto each other |
//! | [`RatioFormula::Naive`] | `input * 4096 / output` | gives "round" ratios, e.g. 2:1 = 8192 |
//!
//! They diverge noticeably for small sizes (`20 -> 2` is 77824 clamped but
//! 40960 naive). Neither is treated as authoritative.
//!
//! Both formulas are evaluated in 32 bits, like the register they feed. An
//! input large enough to overflow `input * 4096` is reported as
//! [`UdsError::Overflow`] instead of being widened.

use crate::error::{UdsError, UdsResult};

// ============================================================================
// Constants
// ============================================================================

/// Number of fractional bits in a U4.12 ratio
pub const RATIO_FRACTION_BITS: u32 = 12;

/// The ratio 1.0 in U4.12
pub const RATIO_ONE: u32 = 1 << RATIO_FRACTION_BITS;

// ============================================================================
// Types
// ============================================================================

/// Formula used to derive a ratio from an (input, output) size pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RatioFormula {
    /// `(input - 1) * 4096 / (output - 1)`
    #[default]
    Clamped,
    /// `input * 4096 / output`
    Naive,
}

impl RatioFormula {
    /// All formulas, in reporting order
    pub const ALL: [RatioFormula; 2] = [RatioFormula::Clamped, RatioFormula::Naive];

    /// Short lowercase name
    pub fn name(self) -> &'static str {
        match self {
            RatioFormula::Clamped => "clamped",
            RatioFormula::Naive => "naive",
        }
    }
}

impl std::fmt::Display for RatioFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Direction of a scaling operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScaleDirection {
    /// Ratio below 1.0, output larger than input
    Up,
    /// Ratio of exactly 1.0
    Identity,
    /// Ratio above 1.0, output smaller than input
    Down,
}

// ============================================================================
// Ratio formulas
// ============================================================================

/// Compute a ratio with the end-point preserving formula
///
/// Returns `(input - 1) * 4096 / (output - 1)`, truncated.
///
/// # Arguments
/// * `input` - Input size in pixels, at least 1
/// * `output` - Output size in pixels, at least 2
///
/// # Errors
/// [`UdsError::InvalidArgument`] when `input == 0` or `output <= 1`,
/// [`UdsError::Overflow`] when `(input - 1) * 4096` does not fit in 32 bits.
pub fn compute_ratio_clamped(input: u32, output: u32) -> UdsResult<u32> {
    if input == 0 {
        return Err(UdsError::invalid("input", input, "input size must be at least 1"));
    }
    if output <= 1 {
        return Err(UdsError::invalid(
            "output",
            output,
            "clamped ratio requires output > 1",
        ));
    }

    let scaled = (input - 1)
        .checked_mul(RATIO_ONE)
        .ok_or_else(|| UdsError::overflow("compute_ratio_clamped"))?;
    Ok(scaled / (output - 1))
}

/// Compute a ratio with the plain size quotient
///
/// Returns `input * 4096 / output`, truncated.
///
/// # Errors
/// [`UdsError::InvalidArgument`] when either size is zero,
/// [`UdsError::Overflow`] when `input * 4096` does not fit in 32 bits.
pub fn compute_ratio_naive(input: u32, output: u32) -> UdsResult<u32> {
    if input == 0 {
        return Err(UdsError::invalid("input", input, "input size must be at least 1"));
    }
    if output == 0 {
        return Err(UdsError::invalid("output", output, "output size must be at least 1"));
    }

    let scaled = input
        .checked_mul(RATIO_ONE)
        .ok_or_else(|| UdsError::overflow("compute_ratio_naive"))?;
    Ok(scaled / output)
}

/// Compute a ratio with the given formula
pub fn compute_ratio(input: u32, output: u32, formula: RatioFormula) -> UdsResult<u32> {
    match formula {
        RatioFormula::Clamped => compute_ratio_clamped(input, output),
        RatioFormula::Naive => compute_ratio_naive(input, output),
    }
}

// ============================================================================
// Ratio inspection
// ============================================================================

/// Split a ratio into its integer part and four decimal digits of fraction
///
/// `ratio_parts(41332)` is `(10, 908)`, printed as `10.0908`.
pub fn ratio_parts(ratio: u32) -> (u32, u32) {
    let integer = ratio >> RATIO_FRACTION_BITS;
    // (RATIO_ONE - 1) * 10000 fits comfortably in u32
    let fraction = (ratio % RATIO_ONE) * 10000 / RATIO_ONE;
    (integer, fraction)
}

/// Format a ratio as `integer.ffff`
pub fn format_ratio(ratio: u32) -> String {
    let (integer, fraction) = ratio_parts(ratio);
    format!("{}.{:04}", integer, fraction)
}

/// Classify a ratio as up-, down- or identity scaling
pub fn scale_direction(ratio: u32) -> ScaleDirection {
    match ratio.cmp(&RATIO_ONE) {
        std::cmp::Ordering::Less => ScaleDirection::Up,
        std::cmp::Ordering::Equal => ScaleDirection::Identity,
        std::cmp::Ordering::Greater => ScaleDirection::Down,
    }
}

/// Filter margin in source pixels for a ratio
///
/// Strong enlargement needs a wider margin around a partition window:
///
/// | Ratio | Scale | Margin |
/// |---|---|---|
/// | `< 0x200` | more than 8x up | 32 |
/// | `< 0x400` | 4x to 8x up | 16 |
/// | `< 0x800` | 2x to 4x up | 8 |
/// | otherwise | at most 2x up | 4 |
pub fn filter_margin(ratio: u32) -> u32 {
    match ratio {
        r if r < 0x200 => 32,
        r if r < 0x400 => 16,
        r if r < 0x800 => 8,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_known_values() {
        assert_eq!(compute_ratio_clamped(1000, 100), Ok(41332));
        assert_eq!(compute_ratio_clamped(2, 2), Ok(4096));
        assert_eq!(compute_ratio_clamped(10, 20), Ok(1940));
        assert_eq!(compute_ratio_clamped(100, 200), Ok(2037));
        assert_eq!(compute_ratio_clamped(20, 2), Ok(77824));
        assert_eq!(compute_ratio_clamped(4096, 2048), Ok(8194));
    }

    #[test]
    fn test_naive_known_values() {
        assert_eq!(compute_ratio_naive(20, 2), Ok(40960));
        assert_eq!(compute_ratio_naive(4096, 2048), Ok(8192));
        assert_eq!(compute_ratio_naive(1920, 720), Ok(10922));
        assert_eq!(compute_ratio_naive(100, 100), Ok(4096));
    }

    #[test]
    fn test_clamped_rejects_degenerate_sizes() {
        assert!(matches!(
            compute_ratio_clamped(100, 1),
            Err(UdsError::InvalidArgument { name: "output", .. })
        ));
        assert!(matches!(
            compute_ratio_clamped(100, 0),
            Err(UdsError::InvalidArgument { name: "output", .. })
        ));
        assert!(matches!(
            compute_ratio_clamped(0, 100),
            Err(UdsError::InvalidArgument { name: "input", .. })
        ));
    }

    #[test]
    fn test_naive_rejects_zero() {
        assert!(compute_ratio_naive(100, 0).is_err());
        assert!(compute_ratio_naive(0, 100).is_err());
        assert_eq!(compute_ratio_naive(100, 1), Ok(409600));
    }

    #[test]
    fn test_overflow_is_flagged() {
        // (1048576 - 1) * 4096 still fits, 1048576 * 4096 is 2^32
        assert!(compute_ratio_clamped(1_048_576, 2).is_ok());
        assert_eq!(
            compute_ratio_clamped(1_048_577, 2),
            Err(UdsError::Overflow {
                operation: "compute_ratio_clamped"
            })
        );
        assert!(compute_ratio_naive(1_048_575, 2).is_ok());
        assert!(matches!(
            compute_ratio_naive(1_048_576, 2),
            Err(UdsError::Overflow { .. })
        ));
    }

    #[test]
    fn test_compute_ratio_dispatch() {
        assert_eq!(
            compute_ratio(20, 2, RatioFormula::Clamped),
            compute_ratio_clamped(20, 2)
        );
        assert_eq!(
            compute_ratio(20, 2, RatioFormula::Naive),
            compute_ratio_naive(20, 2)
        );
    }

    #[test]
    fn test_ratio_parts() {
        assert_eq!(ratio_parts(4096), (1, 0));
        assert_eq!(ratio_parts(41332), (10, 908));
        assert_eq!(ratio_parts(2048), (0, 5000));
        assert_eq!(format_ratio(41332), "10.0908");
        assert_eq!(format_ratio(6144), "1.5000");
    }

    #[test]
    fn test_scale_direction() {
        assert_eq!(scale_direction(2048), ScaleDirection::Up);
        assert_eq!(scale_direction(4096), ScaleDirection::Identity);
        assert_eq!(scale_direction(8192), ScaleDirection::Down);
    }

    #[test]
    fn test_filter_margin() {
        assert_eq!(filter_margin(127), 32);
        assert_eq!(filter_margin(0x200), 16);
        assert_eq!(filter_margin(405), 32);
        assert_eq!(filter_margin(0x7FF), 8);
        assert_eq!(filter_margin(2048), 4);
        assert_eq!(filter_margin(41332), 4);
    }
}
