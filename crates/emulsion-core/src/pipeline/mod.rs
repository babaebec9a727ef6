//! Processing pipeline
//!
//! Drives the three-pass whole-image flow: statistics collection, the
//! per-pixel physics render, and bloom/grain/dither compositing. Pass-1
//! outputs (percentile ranges, saturation factor) are carried forward as
//! explicit typed data so every pass stays independently testable.

mod auto_exposure;
mod composite;
mod normalization;
mod render;
mod statistics;

#[cfg(test)]
mod tests;

pub use auto_exposure::compute_auto_exposure;
pub use normalization::NormalizationParams;

use crate::effects::{apply_coupling_to_density, apply_coupling_to_transmittance, apply_halation};
use crate::engine::SimulationEngine;
use crate::models::{FilmType, ProcessOptions, ToneMode};
use crate::verbose_println;

/// Pixel count above which passes run row-parallel.
pub(crate) const PARALLEL_THRESHOLD: usize = 100_000;

/// Linear-light RGBA input buffer: 4 f32 per pixel, interleaved, indexed
/// by `(row * width + col) * 4 + channel`.
pub struct LinearImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl LinearImage {
    /// Validate dimensions against the buffer length.
    fn check(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "Image dimensions must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.data.len() != expected {
            return Err(format!(
                "Buffer length {} does not match {}x{} RGBA ({} floats)",
                self.data.len(),
                self.width,
                self.height,
                expected
            ));
        }
        Ok(())
    }
}

/// Display-ready 8-bit RGBA output plus the pass-level summary.
#[derive(Debug)]
pub struct ProcessedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub summary: PipelineSummary,
}

/// Pass-level diagnostics: everything derived between pass 1 and pass 2.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Auto-exposure bias in stops (0 when auto-exposure is off).
    pub auto_ev_bias: f32,
    /// Total exposure compensation applied: user EV plus auto bias.
    pub total_ev: f32,
    /// Film type the engine calibrated to.
    pub film_type: FilmType,
    /// Per-channel normalization derived from pass-1 statistics.
    pub normalization: NormalizationParams,
    /// Saturation restoration factor applied in pass 3.
    pub saturation_factor: f32,
}

/// Run the full three-pass pipeline over a linear-light image.
pub fn process_image(
    image: &LinearImage,
    engine: &SimulationEngine,
    options: &ProcessOptions,
) -> Result<ProcessedImage, String> {
    image.check()?;

    let profile = engine.profile();
    let tone_mode = options.tone_mode.unwrap_or(profile.tone_mode);
    let film_type = engine.film_type();

    let auto_ev_bias = if options.auto_exposure {
        compute_auto_exposure(&image.data)
    } else {
        0.0
    };
    let total_ev = options.ev_compensation + auto_ev_bias;

    // Pass 1: per-channel value collections and stage saturation sums.
    let stats = statistics::collect_statistics(image, engine, options, total_ev);

    let normalization = normalization::derive_normalization(
        &stats,
        film_type,
        options.preserve_exposure,
        tone_mode,
    );
    let saturation_factor = normalization::derive_saturation_factor(&stats);

    verbose_println!(
        "[pipeline] film_type={:?} ev={:+.2} (auto {:+.2}) norm_min={:?} norm_scale={:?} sat_factor={:.2}",
        film_type,
        total_ev,
        auto_ev_bias,
        normalization.min,
        normalization.scale,
        saturation_factor
    );
    verbose_println!(
        "[pipeline] saturation by stage: input={:.3} develop={:.3} scan={:.3} output={:.3}",
        stats.input_saturation,
        stats.develop_saturation,
        stats.scan_saturation,
        stats.output_saturation
    );

    // Pass 2: full physics render into a linear working buffer.
    let mut working = render::render_linear(image, engine, options, total_ev, &normalization);

    // Bloom needs the complete pass-2 buffer for spatial context.
    crate::bloom::apply_bloom(&mut working, image.width, image.height, &options.bloom);

    // Pass 3: tone map, saturation restore, grain, dither, quantize.
    let data = composite::composite(
        &working,
        image.width,
        image.height,
        engine,
        options,
        saturation_factor,
        tone_mode,
    );

    Ok(ProcessedImage {
        width: image.width,
        height: image.height,
        data,
        summary: PipelineSummary {
            auto_ev_bias,
            total_ev,
            film_type,
            normalization,
            saturation_factor,
        },
    })
}

/// Shared tail of the physics transform: conditional inversion, dye
/// coupling in the space the value lives in, and halation. Used identically
/// by pass 1 (statistics) and pass 2 (render); B&W film skips coupling and
/// halation entirely.
pub(crate) fn finalize_pixel(
    engine: &SimulationEngine,
    options: &ProcessOptions,
    scanned: [f32; 3],
) -> [f32; 3] {
    let coupling = engine.profile().dye_coupling;
    match engine.film_type() {
        FilmType::Reversal => {
            // Transmittance is already a positive image; no inversion.
            let mut value = scanned;
            if let Some(matrix) = &coupling {
                value = apply_coupling_to_transmittance(value, matrix);
            }
            apply_halation(value, &options.halation)
        }
        FilmType::Negative => {
            let mut density = engine.invert(scanned, 1.0);
            if let Some(matrix) = &coupling {
                density = apply_coupling_to_density(density, matrix);
            }
            apply_halation(density, &options.halation)
        }
        FilmType::BwNegative => engine.invert(scanned, 1.0),
    }
}

/// Whether this tone mode disables percentile clipping during
/// normalization derivation.
pub(crate) fn is_linear_mode(mode: ToneMode) -> bool {
    matches!(mode, ToneMode::Linear)
}
