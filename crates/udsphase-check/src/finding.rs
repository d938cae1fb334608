//! Sweep findings
//!
//! A sweep never stops at the first problem. Every failed cross-check is
//! recorded as a [`Finding`] in a [`Findings`] collection, which keeps the
//! first `limit` findings in detail and counts all of them per kind.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use udsphase_core::UdsError;

// ============================================================================
// Types
// ============================================================================

/// Quantity compared by a formula cross-check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Residual phase
    Residual,
    /// Left source pixel
    Left,
    /// Right source pixel
    Right,
    /// Start phase
    StartPhase,
    /// Pullback shift
    PullbackOffset,
}

impl Quantity {
    /// Short lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Residual => "residual",
            Quantity::Left => "left",
            Quantity::Right => "right",
            Quantity::StartPhase => "start_phase",
            Quantity::PullbackOffset => "pullback_offset",
        }
    }

    /// Names of the two compared formulas, reference first
    pub fn labels(self) -> (&'static str, &'static str) {
        match self {
            Quantity::PullbackOffset => ("congruence", "datasheet"),
            _ => ("reference", "shortcut"),
        }
    }
}

/// Kind of a finding, used for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    InvalidArgument,
    Overflow,
    AlignmentViolation,
    FormulaDisagreement,
    PullbackDisagreement,
    PullbackUnresolved,
    MultiplierOutOfRange,
    MultiplierNotMonotonic,
}

impl FindingKind {
    /// Short lowercase name
    pub fn name(self) -> &'static str {
        match self {
            FindingKind::InvalidArgument => "invalid_argument",
            FindingKind::Overflow => "overflow",
            FindingKind::AlignmentViolation => "alignment_violation",
            FindingKind::FormulaDisagreement => "formula_disagreement",
            FindingKind::PullbackDisagreement => "pullback_disagreement",
            FindingKind::PullbackUnresolved => "pullback_unresolved",
            FindingKind::MultiplierOutOfRange => "multiplier_out_of_range",
            FindingKind::MultiplierNotMonotonic => "multiplier_not_monotonic",
        }
    }
}

/// One failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// The arithmetic rejected its arguments
    InvalidArgument {
        ratio: u32,
        position: u32,
        message: String,
    },
    /// A value did not fit the modeled width
    Overflow {
        ratio: u32,
        position: u32,
        message: String,
    },
    /// The residual breaks the multiple-of-mp restriction
    AlignmentViolation {
        ratio: u32,
        position: u32,
        residual: u32,
        mp: u32,
    },
    /// Two formulas for the same quantity disagree
    FormulaDisagreement {
        ratio: u32,
        position: u32,
        quantity: Quantity,
        reference: u32,
        shortcut: u32,
    },
    /// The residual test and the offset test disagree on a pullback
    PullbackDisagreement {
        ratio: u32,
        position: u32,
        by_residual: bool,
        by_offset: bool,
    },
    /// Applying the pullback left the position misaligned
    PullbackUnresolved {
        ratio: u32,
        position: u32,
        offset: u32,
        pulled_back: u32,
        residual: u32,
    },
    /// The multiplier is not one of 1, 2, 4
    MultiplierOutOfRange { ratio: u32, mp: u32 },
    /// The multiplier decreased from one ratio to the next
    MultiplierNotMonotonic { ratio: u32, previous: u32, mp: u32 },
}

impl Finding {
    /// Convert an arithmetic error met during a sweep
    pub fn from_error(err: &UdsError, ratio: u32, position: u32) -> Self {
        let message = err.to_string();
        match err {
            UdsError::InvalidArgument { .. } => Finding::InvalidArgument {
                ratio,
                position,
                message,
            },
            UdsError::Overflow { .. } => Finding::Overflow {
                ratio,
                position,
                message,
            },
        }
    }

    /// Kind of this finding
    pub fn kind(&self) -> FindingKind {
        match self {
            Finding::InvalidArgument { .. } => FindingKind::InvalidArgument,
            Finding::Overflow { .. } => FindingKind::Overflow,
            Finding::AlignmentViolation { .. } => FindingKind::AlignmentViolation,
            Finding::FormulaDisagreement { .. } => FindingKind::FormulaDisagreement,
            Finding::PullbackDisagreement { .. } => FindingKind::PullbackDisagreement,
            Finding::PullbackUnresolved { .. } => FindingKind::PullbackUnresolved,
            Finding::MultiplierOutOfRange { .. } => FindingKind::MultiplierOutOfRange,
            Finding::MultiplierNotMonotonic { .. } => FindingKind::MultiplierNotMonotonic,
        }
    }

    /// Ratio the finding was observed at
    pub fn ratio(&self) -> u32 {
        match *self {
            Finding::InvalidArgument { ratio, .. }
            | Finding::Overflow { ratio, .. }
            | Finding::AlignmentViolation { ratio, .. }
            | Finding::FormulaDisagreement { ratio, .. }
            | Finding::PullbackDisagreement { ratio, .. }
            | Finding::PullbackUnresolved { ratio, .. }
            | Finding::MultiplierOutOfRange { ratio, .. }
            | Finding::MultiplierNotMonotonic { ratio, .. } => ratio,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::InvalidArgument {
                ratio,
                position,
                message,
            }
            | Finding::Overflow {
                ratio,
                position,
                message,
            } => write!(f, "ratio {} pos {}: {}", ratio, position, message),
            Finding::AlignmentViolation {
                ratio,
                position,
                residual,
                mp,
            } => write!(
                f,
                "ratio {} pos {}: residual {} is not a multiple of mp {}",
                ratio, position, residual, mp
            ),
            Finding::FormulaDisagreement {
                ratio,
                position,
                quantity,
                reference,
                shortcut,
            } => {
                let (reference_label, shortcut_label) = quantity.labels();
                write!(
                    f,
                    "ratio {} pos {}: {} {} ({}) != {} ({})",
                    ratio,
                    position,
                    quantity.name(),
                    reference,
                    reference_label,
                    shortcut,
                    shortcut_label
                )
            }
            Finding::PullbackDisagreement {
                ratio,
                position,
                by_residual,
                by_offset,
            } => write!(
                f,
                "ratio {} pos {}: pullback by residual {} but by offset {}",
                ratio, position, by_residual, by_offset
            ),
            Finding::PullbackUnresolved {
                ratio,
                position,
                offset,
                pulled_back,
                residual,
            } => write!(
                f,
                "ratio {} pos {}: shift {} to {} leaves residual {}",
                ratio, position, offset, pulled_back, residual
            ),
            Finding::MultiplierOutOfRange { ratio, mp } => {
                write!(f, "ratio {}: multiplier {} not in {{1, 2, 4}}", ratio, mp)
            }
            Finding::MultiplierNotMonotonic {
                ratio,
                previous,
                mp,
            } => write!(
                f,
                "ratio {}: multiplier dropped from {} to {}",
                ratio, previous, mp
            ),
        }
    }
}

// ============================================================================
// Collection
// ============================================================================

/// Findings of a run, bounded in detail but counted in full
#[derive(Debug, Clone, Default)]
pub struct Findings {
    items: Vec<Finding>,
    counts: BTreeMap<FindingKind, usize>,
    limit: Option<usize>,
}

impl Findings {
    /// Create a collection keeping at most `limit` findings in detail
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            counts: BTreeMap::new(),
            limit,
        }
    }

    fn has_room(&self) -> bool {
        self.limit.is_none_or(|limit| self.items.len() < limit)
    }

    /// Number of findings that can still be kept in detail
    pub fn remaining(&self) -> Option<usize> {
        self.limit.map(|limit| limit.saturating_sub(self.items.len()))
    }

    /// Record a finding
    pub fn push(&mut self, finding: Finding) {
        *self.counts.entry(finding.kind()).or_default() += 1;
        if self.has_room() {
            self.items.push(finding);
        }
    }

    /// Move all findings of `other` into this collection
    ///
    /// Counts are summed; details are kept while there is room.
    pub fn append(&mut self, other: Findings) {
        for (kind, count) in other.counts {
            *self.counts.entry(kind).or_default() += count;
        }
        for finding in other.items {
            if !self.has_room() {
                break;
            }
            self.items.push(finding);
        }
    }

    /// Total number of findings, including those not kept in detail
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of findings of one kind
    pub fn count(&self, kind: FindingKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Counts per kind
    pub fn counts(&self) -> &BTreeMap<FindingKind, usize> {
        &self.counts
    }

    /// Whether no finding was recorded
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Whether some findings were counted but not kept
    pub fn truncated(&self) -> bool {
        self.total() > self.items.len()
    }

    /// Findings kept in detail, in recording order
    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.items.iter()
    }

    /// Split into detailed findings and counts
    pub fn into_parts(self) -> (Vec<Finding>, BTreeMap<FindingKind, usize>) {
        (self.items, self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(position: u32) -> Finding {
        Finding::AlignmentViolation {
            ratio: 16385,
            position,
            residual: 1,
            mp: 2,
        }
    }

    #[test]
    fn test_push_respects_limit() {
        let mut findings = Findings::new(Some(2));
        for pos in 0..5 {
            findings.push(violation(pos));
        }
        assert_eq!(findings.iter().count(), 2);
        assert_eq!(findings.total(), 5);
        assert_eq!(findings.count(FindingKind::AlignmentViolation), 5);
        assert!(findings.truncated());
        assert_eq!(findings.remaining(), Some(0));
    }

    #[test]
    fn test_append_sums_counts() {
        let mut a = Findings::new(Some(3));
        a.push(violation(1));

        let mut b = Findings::new(Some(1));
        b.push(violation(2));
        b.push(Finding::MultiplierOutOfRange { ratio: 7, mp: 3 });

        a.append(b);
        assert_eq!(a.total(), 3);
        assert_eq!(a.iter().count(), 2);
        assert_eq!(a.count(FindingKind::MultiplierOutOfRange), 1);
        assert!(a.truncated());
    }

    #[test]
    fn test_unlimited() {
        let mut findings = Findings::new(None);
        for pos in 0..100 {
            findings.push(violation(pos));
        }
        assert_eq!(findings.iter().count(), 100);
        assert!(!findings.truncated());
        assert_eq!(findings.remaining(), None);
    }

    #[test]
    fn test_from_error() {
        let err = udsphase_core::phase_calculation(0, 0, 0).unwrap_err();
        let finding = Finding::from_error(&err, 0, 0);
        assert_eq!(finding.kind(), FindingKind::InvalidArgument);
        assert_eq!(finding.ratio(), 0);
    }

    #[test]
    fn test_display_and_json() {
        let finding = Finding::FormulaDisagreement {
            ratio: 16385,
            position: 1,
            quantity: Quantity::Left,
            reference: 6,
            shortcut: 10,
        };
        assert_eq!(
            finding.to_string(),
            "ratio 16385 pos 1: left 6 (reference) != 10 (shortcut)"
        );
        let json = serde_json::to_string(&finding).unwrap();
        assert!(json.contains("\"kind\":\"formula_disagreement\""));
        assert!(json.contains("\"quantity\":\"left\""));
    }

    #[test]
    fn test_pullback_offset_labels() {
        let finding = Finding::FormulaDisagreement {
            ratio: 32769,
            position: 2,
            quantity: Quantity::PullbackOffset,
            reference: 2,
            shortcut: 1,
        };
        assert_eq!(
            finding.to_string(),
            "ratio 32769 pos 2: pullback_offset 2 (congruence) != 1 (datasheet)"
        );
        assert_eq!(Quantity::Residual.labels(), ("reference", "shortcut"));
    }
}
