//! Pullback regression test
//!
//! For every ratio that selects a prefilter multiplier above 1, pulling a
//! destination position back by `residual_offset` must land on a position
//! that satisfies the alignment restriction, and the two pullback tests
//! must agree.

use udsphase_core::{
    PullbackFormula, apply_pullback, multiplier, phase_calculation, pullback_check,
    residual_offset, residual_offset_with,
};
use udsphase_test::RegParams;

#[test]
fn pullback_reg() {
    let mut rp = RegParams::new("pullback");

    let mut datasheet_misses = 0u32;
    for ratio in (0x4000u32..=0xFFFF).step_by(59) {
        let mp = multiplier(ratio);
        rp.check(mp > 1, "ratio range selects the prefilter");

        for pos in (0..4096u32).step_by(7) {
            let offset = residual_offset(pos, ratio);
            rp.check(offset < mp, "shift is below the multiplier");

            let pulled = apply_pullback(pos, ratio);
            let phase = phase_calculation(pulled, 0, ratio).expect("phase");
            rp.check(!phase.alignment_violation(), "pulled back position aligned");

            let check = pullback_check(pos, ratio).expect("check");
            rp.check(check.consistent(), "residual and offset tests agree");

            if residual_offset_with(pos, ratio, PullbackFormula::Datasheet) != offset {
                datasheet_misses += 1;
            }
        }
    }

    // The datasheet projection only ever falls short for mp == 4
    for ratio in (0x4000u32..0x8000).step_by(59) {
        for pos in 0..512u32 {
            rp.check(
                residual_offset_with(pos, ratio, PullbackFormula::Datasheet)
                    == residual_offset(pos, ratio),
                "datasheet formula exact for mp 2",
            );
        }
    }
    rp.check(datasheet_misses > 0, "datasheet formula misses some mp 4 cases");
    if rp.display() {
        eprintln!("  datasheet pullback misses: {}", datasheet_misses);
    }

    // mp == 1 never needs a pullback
    for ratio in (0x7Fu32..0x4000).step_by(211) {
        for pos in (0..4096u32).step_by(31) {
            rp.compare_u32(0, residual_offset(pos, ratio));
            let check = pullback_check(pos, ratio).expect("check");
            rp.check(!check.required(), "no pullback at mp 1");
        }
    }

    assert!(rp.cleanup(), "pullback regression test failed");
}
