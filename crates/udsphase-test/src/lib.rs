//! udsphase-test - Regression test framework for the UDS phase model
//!
//! A small regression harness. Each regression test creates a
//! [`RegParams`], records numbered checks, and asserts on
//! [`RegParams::cleanup`] so a single run lists every failing check
//! instead of stopping at the first.
//!
//! # Usage
//!
//! ```ignore
//! use udsphase_test::RegParams;
//!
//! let mut rp = RegParams::new("ratio");
//! rp.compare_u32(41332, compute_ratio_clamped(1000, 100)?);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"

mod error;
mod params;

pub use error::TestError;
pub use params::{RegParams, RegTestMode};
