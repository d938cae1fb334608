//! Output size regression test
//!
//! Predicts output sizes from the ratios of the exploration table and
//! checks they land on (or next to) the requested output size.

use udsphase_core::{RATIO_ONE, compute_ratio_clamped, compute_ratio_naive, output_size};
use udsphase_test::RegParams;

#[test]
fn output_size_reg() {
    let mut rp = RegParams::new("output_size");

    // Upscaling with the clamped ratio reproduces the requested size
    for (input, output) in [(10u32, 20u32), (100, 200), (200, 400), (8001, 16000)] {
        let ratio = compute_ratio_clamped(input, output).expect("ratio");
        let predicted = output_size(input, ratio).expect("output size");
        if rp.display() {
            eprintln!("  {} -> {}: ratio {} predicts {}", input, output, ratio, predicted);
        }
        rp.compare_values(output as f64, predicted as f64, 1.0);
    }

    // Strong upscales overshoot: the truncated ratio is slightly too small
    for (input, output) in [(100u32, 1000u32), (4096, 8192), (1000, 32000)] {
        let ratio = compute_ratio_clamped(input, output).expect("ratio");
        let predicted = output_size(input, ratio).expect("output size");
        rp.check(predicted >= output, "truncated ratio never undershoots");
    }
    rp.compare_u32(1002, output_size(100, 405).unwrap());

    // Downscaling with the naive ratio
    let ratio = compute_ratio_naive(1920, 720).expect("ratio");
    rp.compare_values(720.0, output_size(1920, ratio).unwrap() as f64, 1.0);
    let ratio = compute_ratio_naive(4096, 2048).expect("ratio");
    rp.compare_u32(2048, output_size(4096, ratio).unwrap());

    // Identity keeps the size
    for input in [1u32, 2, 100, 4096] {
        rp.compare_u32(input, output_size(input, RATIO_ONE).unwrap());
    }

    // The prefilter group truncation can only shrink the output
    for ratio in (0x1001u32..=0xFFFF).step_by(113) {
        for input in (2u32..4000).step_by(97) {
            let out = output_size(input, ratio).unwrap();
            let ungrouped = (input - 1) * RATIO_ONE / ratio + 1;
            rp.check(out <= ungrouped, "grouping never grows the output");
            rp.check(out >= 1, "at least one output pixel");
        }
    }

    rp.check(output_size(0, RATIO_ONE).is_err(), "input 0 rejected");
    rp.check(output_size(100, 0).is_err(), "ratio 0 rejected");

    assert!(rp.cleanup(), "output size regression test failed");
}
