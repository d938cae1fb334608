//! Cross-check sweeps
//!
//! The per-ratio checks ([`check_ratio`], [`check_pullback`]) walk
//! destination positions `0..positions` for one ratio and record every
//! disagreement. [`run_sweep`] runs them over a configured ratio range in
//! parallel and merges the results in ratio order, so a report is the same
//! whatever the thread count.

use rayon::prelude::*;
use udsphase_core::{
    MULTIPLIERS, PullbackFormula, left_pixel, multiplier, phase_calculation, pullback_check,
    residual, residual_offset_with, right_pixel, start_phase,
};

use crate::config::CheckConfig;
use crate::error::{CheckError, CheckResult};
use crate::finding::{Finding, Findings, Quantity};
use crate::report::SweepReport;

/// Ratios handed to the thread pool at a time
const RATIO_CHUNK: usize = 256;

/// Cross-check the shortcut formulas against the phase calculation
///
/// For each position records an `AlignmentViolation` when the reference
/// residual breaks the multiple-of-mp rule, and a `FormulaDisagreement`
/// for each of residual, left, right and start phase whose shortcut value
/// differs from the reference.
pub fn check_ratio(ratio: u32, positions: u32, findings: &mut Findings) {
    for pos in 0..positions {
        let phase = match phase_calculation(pos, 0, ratio) {
            Ok(phase) => phase,
            Err(err) => {
                findings.push(Finding::from_error(&err, ratio, pos));
                continue;
            }
        };

        if phase.alignment_violation() {
            findings.push(Finding::AlignmentViolation {
                ratio,
                position: pos,
                residual: phase.residual,
                mp: phase.mp,
            });
        }

        let shortcuts = [
            (Quantity::Residual, phase.residual, residual(pos, ratio)),
            (Quantity::Left, phase.left, left_pixel(pos, ratio)),
            (Quantity::Right, phase.right, right_pixel(pos, ratio)),
            (Quantity::StartPhase, phase.start_phase(), start_phase(pos, ratio)),
        ];

        for (quantity, reference, shortcut) in shortcuts {
            match shortcut {
                Ok(shortcut) if shortcut != reference => {
                    findings.push(Finding::FormulaDisagreement {
                        ratio,
                        position: pos,
                        quantity,
                        reference,
                        shortcut,
                    });
                }
                Ok(_) => {}
                Err(err) => findings.push(Finding::from_error(&err, ratio, pos)),
            }
        }
    }
}

/// Cross-check the pullback computations
///
/// Records a `PullbackDisagreement` when the residual and offset tests
/// differ, a `FormulaDisagreement` on the pullback offset when the
/// datasheet projection differs from the congruence solution, and a
/// `PullbackUnresolved` when the pulled back position is still misaligned.
pub fn check_pullback(ratio: u32, positions: u32, findings: &mut Findings) {
    for pos in 0..positions {
        let check = match pullback_check(pos, ratio) {
            Ok(check) => check,
            Err(err) => {
                findings.push(Finding::from_error(&err, ratio, pos));
                continue;
            }
        };

        if !check.consistent() {
            findings.push(Finding::PullbackDisagreement {
                ratio,
                position: pos,
                by_residual: check.by_residual,
                by_offset: check.by_offset,
            });
        }

        // Reported as congruence (reference) against datasheet (shortcut)
        let offset = residual_offset_with(pos, ratio, PullbackFormula::Congruence);
        let datasheet = residual_offset_with(pos, ratio, PullbackFormula::Datasheet);
        if datasheet != offset {
            findings.push(Finding::FormulaDisagreement {
                ratio,
                position: pos,
                quantity: Quantity::PullbackOffset,
                reference: offset,
                shortcut: datasheet,
            });
        }

        if offset == 0 {
            continue;
        }
        let pulled_back = pos - offset;
        match phase_calculation(pulled_back, 0, ratio) {
            Ok(phase) if phase.alignment_violation() => {
                findings.push(Finding::PullbackUnresolved {
                    ratio,
                    position: pos,
                    offset,
                    pulled_back,
                    residual: phase.residual,
                });
            }
            Ok(_) => {}
            Err(err) => findings.push(Finding::from_error(&err, ratio, pos)),
        }
    }
}

/// Check the multiplier over a ratio sequence
///
/// Records values outside {1, 2, 4} and any decrease between consecutive
/// ratios of the sequence.
pub fn check_multiplier(ratios: impl IntoIterator<Item = u32>, findings: &mut Findings) {
    let mut previous: Option<u32> = None;
    for ratio in ratios {
        let mp = multiplier(ratio);
        if !MULTIPLIERS.contains(&mp) {
            findings.push(Finding::MultiplierOutOfRange { ratio, mp });
        }
        match previous {
            Some(previous) if mp < previous => {
                findings.push(Finding::MultiplierNotMonotonic {
                    ratio,
                    previous,
                    mp,
                });
            }
            _ => {}
        }
        previous = Some(mp);
    }
}

/// All per-ratio checks for one ratio
fn check_one(ratio: u32, positions: u32, limit: Option<usize>) -> Findings {
    let mut findings = Findings::new(limit);
    check_ratio(ratio, positions, &mut findings);
    check_pullback(ratio, positions, &mut findings);
    findings
}

/// Sweep the configured ratios a chunk at a time
///
/// Returns the number of ratios checked and their findings.
fn sweep(config: &CheckConfig) -> (usize, Findings) {
    let mut findings = Findings::new(config.max_findings);
    check_multiplier(config.ratios(), &mut findings);

    let mut ratios = config.ratios();
    let mut chunk = Vec::with_capacity(RATIO_CHUNK);
    let mut checked = 0;
    loop {
        chunk.clear();
        chunk.extend(ratios.by_ref().take(RATIO_CHUNK));
        let (Some(&first), Some(&last)) = (chunk.first(), chunk.last()) else {
            break;
        };

        let room = findings.remaining();
        let partial: Vec<Findings> = chunk
            .par_iter()
            .map(|&ratio| check_one(ratio, config.positions, room))
            .collect();

        for local in partial {
            findings.append(local);
        }
        checked += chunk.len();
        log::debug!(
            "ratios {}..={}: {} findings so far",
            first,
            last,
            findings.total()
        );
    }

    (checked, findings)
}

/// Run every cross-check over the configured ratio range
///
/// # Errors
/// Only configuration problems are errors; arithmetic problems become
/// findings in the returned report.
pub fn run_sweep(config: &CheckConfig) -> CheckResult<SweepReport> {
    config.validate()?;

    log::info!(
        "sweeping {} ratios from {} to {} over {} positions",
        config.ratio_count(),
        config.ratio_from,
        config.ratio_to,
        config.positions
    );

    let (checked, findings) = match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| CheckError::InvalidConfig(e.to_string()))?;
            pool.install(|| sweep(config))
        }
        None => sweep(config),
    };

    let report = SweepReport::new(config, checked, findings);
    log::info!(
        "sweep finished: {} findings ({} kept)",
        report.total(),
        report.findings.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::FindingKind;

    #[test]
    fn test_check_ratio_clean_for_mp1() {
        let mut findings = Findings::new(None);
        for ratio in [127, 2048, 4096, 10932, 16383] {
            check_ratio(ratio, 4096, &mut findings);
        }
        assert!(findings.is_empty(), "{:?}", findings.iter().next());
    }

    #[test]
    fn test_check_ratio_reports_mp2() {
        let mut findings = Findings::new(None);
        check_ratio(16385, 4, &mut findings);

        // pos 1 and 3 have odd residuals
        assert_eq!(findings.count(FindingKind::AlignmentViolation), 2);
        assert!(findings.iter().any(|f| matches!(
            f,
            Finding::FormulaDisagreement {
                position: 1,
                quantity: Quantity::Left,
                reference: 6,
                shortcut: 10,
                ..
            }
        )));
    }

    #[test]
    fn test_check_ratio_zero_ratio() {
        let mut findings = Findings::new(None);
        check_ratio(0, 3, &mut findings);
        assert_eq!(findings.count(FindingKind::InvalidArgument), 3);
    }

    #[test]
    fn test_check_pullback_mp4() {
        let mut findings = Findings::new(None);
        check_pullback(32769, 8, &mut findings);
        assert_eq!(findings.count(FindingKind::PullbackDisagreement), 0);
        assert_eq!(findings.count(FindingKind::PullbackUnresolved), 0);
        assert!(findings.iter().any(|f| matches!(
            f,
            Finding::FormulaDisagreement {
                position: 2,
                quantity: Quantity::PullbackOffset,
                reference: 2,
                shortcut: 1,
                ..
            }
        )));
    }

    #[test]
    fn test_check_multiplier() {
        let mut findings = Findings::new(None);
        check_multiplier(1..=0xFFFF, &mut findings);
        assert!(findings.is_empty());

        check_multiplier([40000, 4096], &mut findings);
        assert_eq!(findings.count(FindingKind::MultiplierNotMonotonic), 1);
    }

    #[test]
    fn test_run_sweep_is_deterministic() {
        let config = CheckConfig::with_ratio_range(16380, 16400)
            .positions(64)
            .max_findings(Some(10));
        let serial = run_sweep(&config.clone().threads(Some(1))).unwrap();
        let parallel = run_sweep(&config.threads(Some(4))).unwrap();
        assert_eq!(serial.findings, parallel.findings);
        assert_eq!(serial.counts, parallel.counts);
        assert!(serial.truncated);
    }

    #[test]
    fn test_run_sweep_spans_chunks() {
        // 600 ratios cross two chunk boundaries
        let config = CheckConfig::with_ratio_range(4096, 4695).positions(4);
        let report = run_sweep(&config).unwrap();
        assert_eq!(report.ratios_checked, 600);
        assert_eq!(report.ratios_checked, config.ratio_count());
        assert_eq!(report.positions_checked, 2400);
        assert!(report.is_clean());
    }

    #[test]
    fn test_run_sweep_rejects_oversized_range() {
        let config = CheckConfig::with_ratio_range(0, u32::MAX).positions(1);
        assert!(matches!(run_sweep(&config), Err(CheckError::InvalidConfig(_))));
    }
}
