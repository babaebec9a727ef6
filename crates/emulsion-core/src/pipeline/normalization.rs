//! Normalization and saturation-factor derivation
//!
//! Turns pass-1 statistics into the per-channel level mapping applied in
//! pass 2 and the saturation restoration factor applied in pass 3.

use crate::models::{FilmType, ToneMode};

use super::is_linear_mode;
use super::statistics::PipelineStatistics;

/// Percentile used for the black point when preserving exposure.
const BLACK_POINT_PERCENTILE: f32 = 0.005;

/// Fixed density span mapped to paper white when preserving exposure on
/// negative film.
const PAPER_WHITE_SPAN: f32 = 2.7;

/// Adaptive clipping percentiles for non-linear tone modes.
const CLIP_LOW: f32 = 0.005;
const CLIP_HIGH: f32 = 0.995;

/// Compensation constant for saturation lost through the physics chain.
const SATURATION_COMPENSATION: f32 = 1.5;

/// Bounds on the saturation restoration factor.
const SATURATION_FACTOR_RANGE: (f32, f32) = (1.0, 5.0);

/// Guard against a degenerate value range.
const MIN_RANGE: f32 = 1e-6;

/// Per-channel level mapping: `normalized = (value - min) * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationParams {
    pub min: [f32; 3],
    pub scale: [f32; 3],
}

impl NormalizationParams {
    /// The identity mapping.
    pub fn identity() -> Self {
        Self {
            min: [0.0; 3],
            scale: [1.0; 3],
        }
    }

    /// Apply the mapping to one channel value.
    #[inline]
    pub fn apply(&self, value: f32, channel: usize) -> f32 {
        (value - self.min[channel]) * self.scale[channel]
    }
}

/// Derive the pass-2 normalization from pass-1 statistics.
pub(crate) fn derive_normalization(
    stats: &PipelineStatistics,
    film_type: FilmType,
    preserve_exposure: bool,
    tone_mode: ToneMode,
) -> NormalizationParams {
    if preserve_exposure {
        if film_type == FilmType::Reversal {
            // Transmittance already lives in [0, 1].
            return NormalizationParams::identity();
        }
        // Negative/BW: anchor the black point and map a fixed paper-white
        // density span.
        let mut min = [0.0f32; 3];
        for c in 0..3 {
            min[c] = percentile(&stats.channels[c], BLACK_POINT_PERCENTILE);
        }
        return NormalizationParams {
            min,
            scale: [1.0 / PAPER_WHITE_SPAN; 3],
        };
    }

    // Adaptive percentile clipping; linear mode keeps the full range.
    let (lo_p, hi_p) = if is_linear_mode(tone_mode) {
        (0.0, 1.0)
    } else {
        (CLIP_LOW, CLIP_HIGH)
    };

    let mut min = [0.0f32; 3];
    let mut scale = [1.0f32; 3];
    for c in 0..3 {
        let lo = percentile(&stats.channels[c], lo_p);
        let hi = percentile(&stats.channels[c], hi_p);
        let range = hi - lo;
        min[c] = lo;
        scale[c] = if range > MIN_RANGE { 1.0 / range } else { 1.0 };
    }
    NormalizationParams { min, scale }
}

/// Ratio of scene saturation to post-physics saturation, compensated and
/// clamped. Restores the chroma the density chain flattens out.
pub(crate) fn derive_saturation_factor(stats: &PipelineStatistics) -> f32 {
    let input = stats.input_saturation;
    let output = stats.output_saturation.max(1e-6);
    (SATURATION_COMPENSATION * input / output)
        .clamp(SATURATION_FACTOR_RANGE.0, SATURATION_FACTOR_RANGE.1)
}

/// Value at a percentile of an already-sorted collection.
fn percentile(sorted: &[f32], p: f32) -> f32 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (p.clamp(0.0, 1.0) * (sorted.len() - 1) as f32).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
