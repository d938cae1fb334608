//! udsphase-core - Fixed-point arithmetic of the UDS polyphase scaler
//!
//! This crate models the integer arithmetic a Universal Down-Scaler (UDS)
//! driver performs to program its polyphase filter:
//!
//! - Ratio computation in U4.12 fixed point ([`ratio`])
//! - Prefilter multiplier selection ([`multiplier`])
//! - Phase, residual and source pixel decomposition ([`phase`])
//! - Partition window pullback for the alignment restriction ([`pullback`])
//! - Output size prediction ([`output_size`])
//!
//! Every function is pure. Preconditions are checked and reported as
//! [`UdsError`] values rather than arithmetic faults.
//!
//! # Example
//!
//! ```
//! use udsphase_core::{compute_ratio_clamped, multiplier, phase_calculation};
//!
//! let ratio = compute_ratio_clamped(1000, 100).unwrap();
//! assert_eq!(ratio, 41332);
//! assert_eq!(multiplier(ratio), 4);
//!
//! let phase = phase_calculation(10, 0, ratio).unwrap();
//! assert_eq!(phase.mp, 4);
//! ```

mod error;
pub mod multiplier;
pub mod output_size;
pub mod phase;
pub mod pullback;
pub mod ratio;

pub use error::{UdsError, UdsResult};
pub use multiplier::{MULTIPLIERS, is_mp_aligned, multiplier};
pub use output_size::output_size;
pub use phase::{
    PhaseResult, left_pixel, phase_calculation, phase_edge, residual, right_pixel,
    src_left_pixel, start_phase,
};
pub use pullback::{
    PullbackCheck, PullbackFormula, apply_pullback, is_aligned_position, pullback_check,
    pullback_required, residual_offset, residual_offset_with,
};
pub use ratio::{
    RATIO_FRACTION_BITS, RATIO_ONE, RatioFormula, ScaleDirection, compute_ratio,
    compute_ratio_clamped, compute_ratio_naive, filter_margin, format_ratio, ratio_parts,
    scale_direction,
};
