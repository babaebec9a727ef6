//! Log-average auto-exposure metering
//!
//! Computes a global EV bias from a strided sample of the input buffer's
//! geometric mean luminance against a fixed perceptual gray target. The
//! bias is additive with any user-specified exposure compensation.

use crate::color::luminance;

/// Target log-average scene luminance.
const TARGET_LUMINANCE: f32 = 0.25;

/// Approximate number of pixels to sample.
const SAMPLE_BUDGET: usize = 10_000;

/// Floor under sampled luminance so the log stays finite.
const LUMINANCE_FLOOR: f32 = 1e-6;

/// Compute the EV bias that brings the buffer's log-average luminance to
/// the target. Positive bias means the scene is darker than the target.
pub fn compute_auto_exposure(data: &[f32]) -> f32 {
    let pixels = data.len() / 4;
    if pixels == 0 {
        return 0.0;
    }

    let stride = (pixels / SAMPLE_BUDGET).max(1);
    let mut log_sum = 0.0f64;
    let mut count = 0usize;

    let mut i = 0;
    while i < pixels {
        let base = i * 4;
        let lum = luminance(data[base], data[base + 1], data[base + 2]);
        log_sum += f64::from(lum.max(LUMINANCE_FLOOR).ln());
        count += 1;
        i += stride;
    }

    let geo_mean = (log_sum / count as f64).exp() as f32;
    (TARGET_LUMINANCE / geo_mean.max(LUMINANCE_FLOOR)).log2()
}
