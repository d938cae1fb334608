//! Ratio table
//!
//! Tabulates each configured size pair under each ratio formula, with the
//! multiplier, filter margin and predicted output size the ratio implies.

use std::fmt;

use serde::Serialize;
use udsphase_core::{
    RatioFormula, ScaleDirection, compute_ratio, filter_margin, format_ratio, multiplier,
    output_size, scale_direction,
};

use crate::config::{CheckConfig, SizePair};

/// Values derived from one ratio
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatioStats {
    pub ratio: u32,
    pub mp: u32,
    pub margin: u32,
    pub direction: ScaleDirection,
    /// Output size predicted from the ratio, or why it could not be
    pub predicted_output: Result<u32, String>,
}

/// One formula applied to one size pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatioEntry {
    pub formula: RatioFormula,
    pub stats: Result<RatioStats, String>,
}

/// All formulas applied to one size pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatioRow {
    pub pair: SizePair,
    pub entries: Vec<RatioEntry>,
}

impl RatioRow {
    /// Ratio produced by a formula, if it produced one
    pub fn ratio(&self, formula: RatioFormula) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.formula == formula)
            .and_then(|e| e.stats.as_ref().ok())
            .map(|s| s.ratio)
    }

    /// Clamped minus naive ratio, when both are available
    pub fn divergence(&self) -> Option<i64> {
        let clamped = self.ratio(RatioFormula::Clamped)?;
        let naive = self.ratio(RatioFormula::Naive)?;
        Some(i64::from(clamped) - i64::from(naive))
    }
}

/// Ratio table for the configured size pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatioTable {
    pub rows: Vec<RatioRow>,
}

fn ratio_stats(pair: SizePair, formula: RatioFormula) -> Result<RatioStats, String> {
    let ratio = compute_ratio(pair.input, pair.output, formula).map_err(|e| e.to_string())?;
    Ok(RatioStats {
        ratio,
        mp: multiplier(ratio),
        margin: filter_margin(ratio),
        direction: scale_direction(ratio),
        predicted_output: output_size(pair.input, ratio).map_err(|e| e.to_string()),
    })
}

/// Build the ratio table for a configuration
pub fn ratio_table(config: &CheckConfig) -> RatioTable {
    let rows = config
        .pairs
        .iter()
        .map(|&pair| RatioRow {
            pair,
            entries: config
                .formulas
                .iter()
                .map(|&formula| RatioEntry {
                    formula,
                    stats: ratio_stats(pair, formula),
                })
                .collect(),
        })
        .collect();
    RatioTable { rows }
}

impl RatioTable {
    /// Render the table as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RatioTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for entry in &row.entries {
                write!(
                    f,
                    " In {} : Out {} : {:<7} ",
                    row.pair.input, row.pair.output, entry.formula
                )?;
                match &entry.stats {
                    Ok(stats) => {
                        write!(
                            f,
                            "Ratio : {} ({}): Multiplier {} Margin {}",
                            stats.ratio,
                            format_ratio(stats.ratio),
                            stats.mp,
                            stats.margin
                        )?;
                        match &stats.predicted_output {
                            Ok(size) => writeln!(f, " Output {}", size)?,
                            Err(e) => writeln!(f, " Output error: {}", e)?,
                        }
                    }
                    Err(e) => writeln!(f, "error: {}", e)?,
                }
            }
            if let Some(delta) = row.divergence().filter(|&d| d != 0) {
                writeln!(f, "   clamped - naive = {}", delta)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = ratio_table(&CheckConfig::default());
        assert_eq!(table.rows.len(), 15);

        let row = table
            .rows
            .iter()
            .find(|r| r.pair == SizePair::new(20, 2))
            .unwrap();
        assert_eq!(row.ratio(RatioFormula::Clamped), Some(77824));
        assert_eq!(row.ratio(RatioFormula::Naive), Some(40960));
        assert_eq!(row.divergence(), Some(36864));
    }

    #[test]
    fn test_invalid_pair_is_reported() {
        let config = CheckConfig::default().pairs(vec![SizePair::new(100, 1)]);
        let table = ratio_table(&config);
        let row = &table.rows[0];
        assert!(row.entries[0].stats.is_err());
        assert_eq!(row.ratio(RatioFormula::Naive), Some(409600));
        assert_eq!(row.divergence(), None);
        assert!(table.to_string().contains("error: invalid argument output = 1"));
    }

    #[test]
    fn test_display_line() {
        let config = CheckConfig::default().pairs(vec![SizePair::new(1000, 100)]);
        let text = ratio_table(&config).to_string();
        assert!(text.contains(
            " In 1000 : Out 100 : clamped Ratio : 41332 (10.0908): Multiplier 4 Margin 4 Output 99"
        ));
        assert!(text.contains("clamped - naive = 372"));
    }
}
