//! Check run configuration
//!
//! A [`CheckConfig`] describes what a run tabulates and sweeps. It has
//! sensible defaults, builder-style setters, and can be loaded from JSON:
//!
//! ```json
//! {
//!   "pairs": [{ "input": 1920, "output": 720 }],
//!   "ratio_from": 16384,
//!   "ratio_to": 32767,
//!   "positions": 1024,
//!   "max_findings": 50
//! }
//! ```
//!
//! Missing fields take their default values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use udsphase_core::RatioFormula;

use crate::error::{CheckError, CheckResult};

// ============================================================================
// Size pairs
// ============================================================================

/// An (input, output) size pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePair {
    /// Input size
    pub input: u32,
    /// Output size
    pub output: u32,
}

impl SizePair {
    /// Create a size pair
    pub const fn new(input: u32, output: u32) -> Self {
        Self { input, output }
    }
}

/// Exploration table of size pairs
///
/// Upscales from 1:1 to 1:32, then downscales up to 16:1. The small
/// downscale `20 -> 2` is where the two ratio formulas differ most.
pub const DEFAULT_PAIRS: [SizePair; 15] = [
    // Upscaling
    SizePair::new(2, 2),
    SizePair::new(100, 100),
    SizePair::new(10, 20),
    SizePair::new(100, 200),
    SizePair::new(200, 400),
    SizePair::new(4096, 8192),
    SizePair::new(8001, 16000),
    SizePair::new(100, 1000),
    SizePair::new(1000, 16 * 1000),
    SizePair::new(1000, 32 * 1000),
    // Downscaling
    SizePair::new(1000, 100),
    SizePair::new(20, 2),
    SizePair::new(4096, 2048),
    SizePair::new(1920, 720),
    SizePair::new(4096, 256),
];

// ============================================================================
// Trace settings
// ============================================================================

/// Settings for a phase trace over consecutive positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Size pair the traced ratio is derived from
    pub pair: SizePair,
    /// Formula used to derive the ratio
    pub formula: RatioFormula,
    /// Number of positions to trace, starting at 0
    pub count: u32,
    /// Start phase passed to the phase calculation
    pub start_phase: u32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            pair: SizePair::new(10, 1024),
            formula: RatioFormula::Clamped,
            count: 256,
            start_phase: 0,
        }
    }
}

// ============================================================================
// Check configuration
// ============================================================================

/// Largest ratio a sweep may visit, the top of the U4.12 register
pub const MAX_SWEEP_RATIO: u32 = 0xFFFF;

/// Configuration of a check run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Size pairs to tabulate
    pub pairs: Vec<SizePair>,
    /// Ratio formulas to tabulate, in column order
    pub formulas: Vec<RatioFormula>,
    /// First ratio of the sweep
    pub ratio_from: u32,
    /// Last ratio of the sweep (inclusive)
    pub ratio_to: u32,
    /// Distance between swept ratios
    pub ratio_step: u32,
    /// Destination positions checked per ratio, starting at 0
    pub positions: u32,
    /// Phase trace settings
    pub trace: TraceConfig,
    /// Maximum number of findings kept in detail (None = unlimited)
    ///
    /// Findings past the limit are still counted.
    pub max_findings: Option<usize>,
    /// Worker threads for sweeps (None = rayon default)
    pub threads: Option<usize>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_PAIRS.to_vec(),
            formulas: RatioFormula::ALL.to_vec(),
            ratio_from: 0x7F,
            ratio_to: 0xFFFF,
            ratio_step: 1,
            positions: 4096,
            trace: TraceConfig::default(),
            max_findings: Some(1000),
            threads: None,
        }
    }
}

impl CheckConfig {
    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> CheckResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> CheckResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Create a configuration sweeping the given inclusive ratio range
    pub fn with_ratio_range(from: u32, to: u32) -> Self {
        Self {
            ratio_from: from,
            ratio_to: to,
            ..Default::default()
        }
    }

    /// Set the ratio step
    pub fn ratio_step(mut self, step: u32) -> Self {
        self.ratio_step = step;
        self
    }

    /// Set the number of positions per ratio
    pub fn positions(mut self, positions: u32) -> Self {
        self.positions = positions;
        self
    }

    /// Set the size pairs to tabulate
    pub fn pairs(mut self, pairs: Vec<SizePair>) -> Self {
        self.pairs = pairs;
        self
    }

    /// Set the detailed findings limit
    pub fn max_findings(mut self, limit: Option<usize>) -> Self {
        self.max_findings = limit;
        self
    }

    /// Set the sweep thread count
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Check the configuration for values a run cannot use
    pub fn validate(&self) -> CheckResult<()> {
        if self.ratio_from > self.ratio_to {
            return Err(CheckError::InvalidConfig(format!(
                "ratio_from {} is above ratio_to {}",
                self.ratio_from, self.ratio_to
            )));
        }
        if self.ratio_to > MAX_SWEEP_RATIO {
            return Err(CheckError::InvalidConfig(format!(
                "ratio_to {} is above the largest U4.12 ratio {}",
                self.ratio_to, MAX_SWEEP_RATIO
            )));
        }
        if self.ratio_step == 0 {
            return Err(CheckError::InvalidConfig("ratio_step must be at least 1".into()));
        }
        if self.positions == 0 {
            return Err(CheckError::InvalidConfig("positions must be at least 1".into()));
        }
        if self.formulas.is_empty() {
            return Err(CheckError::InvalidConfig("at least one ratio formula is required".into()));
        }
        if self.threads == Some(0) {
            return Err(CheckError::InvalidConfig("threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Ratios visited by the sweep, in ascending order
    pub fn ratios(&self) -> impl Iterator<Item = u32> + use<> {
        (self.ratio_from..=self.ratio_to).step_by(self.ratio_step.max(1) as usize)
    }

    /// Number of ratios visited by the sweep
    pub fn ratio_count(&self) -> usize {
        if self.ratio_from > self.ratio_to {
            return 0;
        }
        ((self.ratio_to - self.ratio_from) / self.ratio_step.max(1)) as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CheckConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pairs.len(), 15);
        assert_eq!(config.ratios().count(), 0xFFFF - 0x7F + 1);
    }

    #[test]
    fn test_builders() {
        let config = CheckConfig::with_ratio_range(16384, 16400)
            .ratio_step(4)
            .positions(64)
            .max_findings(None);
        assert_eq!(
            config.ratios().collect::<Vec<_>>(),
            vec![16384, 16388, 16392, 16396, 16400]
        );
        assert_eq!(config.positions, 64);
        assert_eq!(config.max_findings, None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(CheckConfig::with_ratio_range(10, 5).validate().is_err());
        assert!(CheckConfig::default().ratio_step(0).validate().is_err());
        assert!(CheckConfig::default().positions(0).validate().is_err());
        assert!(CheckConfig::default().threads(Some(0)).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_range() {
        assert!(CheckConfig::with_ratio_range(0, MAX_SWEEP_RATIO).validate().is_ok());
        assert!(matches!(
            CheckConfig::with_ratio_range(0, MAX_SWEEP_RATIO + 1).validate(),
            Err(CheckError::InvalidConfig(_))
        ));
        assert!(matches!(
            CheckConfig::from_json_str(r#"{"ratio_from":0,"ratio_to":4294967295,"positions":1}"#),
            Err(CheckError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_ratio_count() {
        assert_eq!(CheckConfig::default().ratio_count(), 0xFFFF - 0x7F + 1);
        let config = CheckConfig::with_ratio_range(16384, 16400).ratio_step(4);
        assert_eq!(config.ratio_count(), 5);
        assert_eq!(config.ratio_count(), config.ratios().count());
        let config = CheckConfig::with_ratio_range(16384, 16402).ratio_step(4);
        assert_eq!(config.ratio_count(), config.ratios().count());
        assert_eq!(CheckConfig::with_ratio_range(10, 5).ratio_count(), 0);
    }

    #[test]
    fn test_from_json_partial() {
        let config = CheckConfig::from_json_str(
            r#"{ "pairs": [{ "input": 1920, "output": 720 }], "ratio_from": 16384,
                 "formulas": ["naive"], "trace": { "count": 8 } }"#,
        )
        .unwrap();
        assert_eq!(config.pairs, vec![SizePair::new(1920, 720)]);
        assert_eq!(config.ratio_from, 16384);
        assert_eq!(config.ratio_to, 0xFFFF);
        assert_eq!(config.formulas, vec![RatioFormula::Naive]);
        assert_eq!(config.trace.count, 8);
        assert_eq!(config.trace.pair, SizePair::new(10, 1024));
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            CheckConfig::from_json_str("{ \"ratio_step\": 0 }"),
            Err(CheckError::InvalidConfig(_))
        ));
        assert!(matches!(
            CheckConfig::from_json_str("{ \"positions\": -1 }"),
            Err(CheckError::Json(_))
        ));
    }
}
