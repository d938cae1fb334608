//! udsphase - Phase arithmetic of the UDS polyphase scaler
//!
//! Models the fixed-point arithmetic a Universal Down-Scaler driver uses
//! to program its polyphase filter, and validates it over whole ratio
//! ranges.
//!
//! # Overview
//!
//! - Ratio, multiplier, phase, pullback and output size arithmetic
//!   (re-exported from `udsphase-core`)
//! - Ratio tables, phase traces and cross-check sweeps ([`check`])
//!
//! The `udsphase` binary drives both from the command line.
//!
//! # Example
//!
//! ```
//! use udsphase::{compute_ratio_naive, output_size};
//!
//! let ratio = compute_ratio_naive(1920, 720).unwrap();
//! assert_eq!(ratio, 10922);
//! assert_eq!(output_size(1920, ratio).unwrap(), 720);
//! ```

// Re-export the arithmetic at the top level
pub use udsphase_core::*;

// Re-export the harness as a module
pub use udsphase_check as check;
