//! Regression test parameters and operations

use crate::error::TestError;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare computed values against expectations (default)
    #[default]
    Compare,
    /// Compare, and also print the diagnostic tables the tests produce
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("REGTEST_MODE").unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the state of a regression test: the test name, the index of
/// the current check, the mode, and every failure seen so far. Checks
/// never panic; the test asserts on [`RegParams::cleanup`] at the end so
/// that one run reports all failures.
pub struct RegParams {
    /// Name of the test (e.g., "phase")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "phase")
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let err = TestError::ValueMismatch {
                index: self.index,
                expected,
                actual,
                delta,
            };
            self.record(format!("Failure in {}_reg: {}", self.test_name, err));
            false
        } else {
            true
        }
    }

    /// Compare two unsigned integers for exact equality
    pub fn compare_u32(&mut self, expected: u32, actual: u32) -> bool {
        self.compare_values(f64::from(expected), f64::from(actual), 0.0)
    }

    /// Record a boolean condition
    ///
    /// # Arguments
    ///
    /// * `condition` - Must hold for the check to pass
    /// * `what` - Description printed on failure
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;

        if !condition {
            self.record(format!(
                "Failure in {}_reg: check {} failed: {}",
                self.test_name, self.index, what
            ));
        }
        condition
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(RegTestMode::parse("display"), RegTestMode::Display);
        assert_eq!(RegTestMode::parse("DISPLAY"), RegTestMode::Display);
        assert_eq!(RegTestMode::parse(""), RegTestMode::Compare);
        assert_eq!(RegTestMode::parse("generate"), RegTestMode::Compare);
    }

    #[test]
    fn test_compare_values_success() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(720.0, 719.0, 1.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_u32_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_u32(41332, 41333));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
        assert!(rp.failures()[0].contains("expected 41332"));
    }

    #[test]
    fn test_check_and_cleanup() {
        let mut rp = RegParams::new("test");
        assert!(rp.check(true, "holds"));
        assert!(!rp.check(false, "does not hold"));
        assert_eq!(rp.index(), 2);
        assert_eq!(rp.failures().len(), 1);
        assert!(rp.failures()[0].contains("check 2 failed: does not hold"));
        assert!(!rp.cleanup());
    }
}
