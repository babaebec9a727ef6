//! Pass 3: display compositing
//!
//! Tone-maps the bloomed linear buffer to display range, restores
//! saturation, applies grain, dithers, and quantizes to 8-bit RGBA.
//! Monochrome film is forced to a luma-only gray image before grain.

use rayon::prelude::*;

use crate::color::{boost_saturation, luminance};
use crate::engine::SimulationEngine;
use crate::grain::{apply_grain, hash_unit};
use crate::models::{ProcessOptions, ToneMode};
use crate::tone_mapping::tone_map;

use super::PARALLEL_THRESHOLD;

/// Dither amplitude: half an 8-bit quantization step.
const DITHER_AMPLITUDE: f32 = 1.0 / 510.0;

/// Hash salt distinguishing the dither field from the grain field.
const DITHER_SALT: u32 = 0xD17E;

/// Composite the working buffer into the final 8-bit RGBA output.
pub(crate) fn composite(
    working: &[f32],
    width: u32,
    height: u32,
    engine: &SimulationEngine,
    options: &ProcessOptions,
    saturation_factor: f32,
    tone_mode: ToneMode,
) -> Vec<u8> {
    let row_len = width as usize * 4;
    let pixels = working.len() / 4;
    let monochrome = engine.film_type().is_monochrome();
    let iso = engine.profile().iso;
    let white_point = engine.profile().white_point;

    let mut out = vec![0u8; working.len()];

    let composite_row = |y: usize, src: &[f32], dst: &mut [u8]| {
        for (x, (px, dst_px)) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)).enumerate() {
            let mut rgb = [
                tone_map(px[0], tone_mode, white_point),
                tone_map(px[1], tone_mode, white_point),
                tone_map(px[2], tone_mode, white_point),
            ];

            if monochrome {
                let luma = luminance(rgb[0], rgb[1], rgb[2]);
                rgb = [luma, luma, luma];
            } else if saturation_factor > 1.0 {
                let (r, g, b) = boost_saturation(rgb[0], rgb[1], rgb[2], saturation_factor);
                rgb = [r, g, b];
            }

            rgb = apply_grain(
                rgb,
                x as u32,
                y as u32,
                iso,
                monochrome,
                &options.grain,
            );

            for c in 0..3 {
                // Monochrome shares one dither value so gray stays gray
                // through quantization.
                let salt = if monochrome {
                    DITHER_SALT
                } else {
                    DITHER_SALT + c as u32
                };
                let dither = (hash_unit(x as u32, y as u32, salt, options.dither_seed) * 2.0
                    - 1.0)
                    * DITHER_AMPLITUDE;
                dst_px[c] = quantize(rgb[c] + dither);
            }
            dst_px[3] = quantize(px[3]);
        }
    };

    if pixels >= PARALLEL_THRESHOLD {
        out.par_chunks_mut(row_len)
            .zip(working.par_chunks(row_len))
            .enumerate()
            .for_each(|(y, (dst, src))| composite_row(y, src, dst));
    } else {
        for (y, (dst, src)) in out.chunks_mut(row_len).zip(working.chunks(row_len)).enumerate() {
            composite_row(y, src, dst);
        }
    }

    out
}

#[inline]
fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
