//! Pass 2: full per-pixel physics render
//!
//! Re-runs the engine transform with the density-space effects, then maps
//! every channel through the derived normalization into a linear working
//! buffer. Alpha is carried over from the input unchanged.

use rayon::prelude::*;

use crate::engine::SimulationEngine;
use crate::models::ProcessOptions;

use super::normalization::NormalizationParams;
use super::{finalize_pixel, LinearImage, PARALLEL_THRESHOLD};

/// Render the image into a normalized linear RGBA buffer.
pub(crate) fn render_linear(
    image: &LinearImage,
    engine: &SimulationEngine,
    options: &ProcessOptions,
    ev: f32,
    norm: &NormalizationParams,
) -> Vec<f32> {
    let row_len = image.width as usize * 4;
    let pixels = image.data.len() / 4;
    let mut out = vec![0.0f32; image.data.len()];

    let render_row = |src: &[f32], dst: &mut [f32]| {
        for (px, dst_px) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
            let scanned = engine.process_pixel([px[0], px[1], px[2]], ev);
            let value = finalize_pixel(engine, options, scanned);
            for c in 0..3 {
                dst_px[c] = norm.apply(value[c], c);
            }
            dst_px[3] = px[3];
        }
    };

    if pixels >= PARALLEL_THRESHOLD {
        out.par_chunks_mut(row_len)
            .zip(image.data.par_chunks(row_len))
            .for_each(|(dst, src)| render_row(src, dst));
    } else {
        for (dst, src) in out.chunks_mut(row_len).zip(image.data.chunks(row_len)) {
            render_row(src, dst);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{gradient_image, negative_profile};

    #[test]
    fn test_render_preserves_alpha_and_shape() {
        let profile = negative_profile();
        let engine = SimulationEngine::new(&profile);
        let mut data = gradient_image(10, 10);
        data[3] = 0.5; // distinctive alpha on the first pixel
        let image = LinearImage {
            width: 10,
            height: 10,
            data,
        };
        let out = render_linear(
            &image,
            &engine,
            &ProcessOptions::default(),
            0.0,
            &NormalizationParams::identity(),
        );
        assert_eq!(out.len(), image.data.len());
        assert_eq!(out[3], 0.5);
        assert_eq!(out[7], 1.0);
    }

    #[test]
    fn test_normalization_shifts_output() {
        let profile = negative_profile();
        let engine = SimulationEngine::new(&profile);
        let image = LinearImage {
            width: 4,
            height: 4,
            data: gradient_image(4, 4),
        };
        let identity = render_linear(
            &image,
            &engine,
            &ProcessOptions::default(),
            0.0,
            &NormalizationParams::identity(),
        );
        let shifted = render_linear(
            &image,
            &engine,
            &ProcessOptions::default(),
            0.0,
            &NormalizationParams {
                min: [0.1; 3],
                scale: [2.0; 3],
            },
        );
        for (i, (a, b)) in identity.iter().zip(shifted.iter()).enumerate() {
            if i % 4 == 3 {
                assert_eq!(a, b, "alpha untouched by normalization");
            } else {
                assert!(((a - 0.1) * 2.0 - b).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_brighter_scene_renders_brighter_positive() {
        let profile = negative_profile();
        let engine = SimulationEngine::new(&profile);
        let dark = LinearImage {
            width: 1,
            height: 1,
            data: vec![0.05, 0.05, 0.05, 1.0],
        };
        let bright = LinearImage {
            width: 1,
            height: 1,
            data: vec![0.5, 0.5, 0.5, 1.0],
        };
        let opts = ProcessOptions::default();
        let norm = NormalizationParams::identity();
        let d = render_linear(&dark, &engine, &opts, 0.0, &norm);
        let b = render_linear(&bright, &engine, &opts, 0.0, &norm);
        for c in 0..3 {
            assert!(
                b[c] > d[c],
                "positive density must grow with scene light: {} vs {}",
                b[c],
                d[c]
            );
        }
    }
}
