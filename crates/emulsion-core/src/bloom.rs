//! Pyramid bloom
//!
//! Simulated highlight scattering: extract a thresholded highlight buffer,
//! build a pyramid of progressively blurred and downsampled levels, then
//! composite every level back onto the full-resolution linear buffer with
//! per-level weights. Runs once per image, in linear light, after the
//! per-pixel physics stages.

use rayon::prelude::*;

use crate::color::luminance;
use crate::models::BloomParams;

/// Apply pyramid bloom to an interleaved RGBA f32 buffer in place.
///
/// `strength <= 0` (or an empty weight list) short-circuits and leaves the
/// buffer untouched. The alpha channel is never modified.
pub fn apply_bloom(data: &mut [f32], width: u32, height: u32, params: &BloomParams) {
    if params.strength <= 0.0 || params.weights.is_empty() {
        return;
    }
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 || data.len() < w * h * 4 {
        return;
    }

    let mut current = extract_highlights(data, params.threshold);
    let (mut cur_w, mut cur_h) = (w, h);

    // Each pyramid level keeps its blurred buffer at its own resolution.
    let mut levels: Vec<(Vec<f32>, usize, usize)> = Vec::with_capacity(params.weights.len());

    for (level, _) in params.weights.iter().enumerate() {
        let radius = blur_radius(params.radius, level);
        let blurred = box_blur(&current, cur_w, cur_h, radius);

        if level + 1 < params.weights.len() && (cur_w > 1 || cur_h > 1) {
            let next_w = (cur_w / 2).max(1);
            let next_h = (cur_h / 2).max(1);
            current = downsample_nearest(&blurred, cur_w, next_w, next_h);
            levels.push((blurred, cur_w, cur_h));
            cur_w = next_w;
            cur_h = next_h;
        } else {
            levels.push((blurred, cur_w, cur_h));
        }
    }

    // Composite: bilinearly upsample each level to full resolution and add
    // its weighted contribution onto the RGB channels.
    for (level, (buffer, lw, lh)) in levels.iter().enumerate() {
        let gain = params.weights[level] * params.strength;
        if gain <= 0.0 {
            continue;
        }
        data.par_chunks_mut(w * 4).enumerate().for_each(|(y, row)| {
            for x in 0..w {
                let sample = sample_bilinear(buffer, *lw, *lh, x, y, w, h);
                for c in 0..3 {
                    row[x * 4 + c] += gain * sample[c];
                }
            }
        });
    }
}

/// Blur radius for a pyramid level, at that level's resolution.
#[inline]
fn blur_radius(base: f32, level: usize) -> usize {
    (base * (level as f32 + 1.0)).round().max(1.0) as usize
}

/// Per-pixel highlight extraction. Pixels whose luminance exceeds the
/// threshold keep their RGB scaled by `(lum - threshold) / (1 - threshold)`;
/// everything else becomes transparent black.
fn extract_highlights(data: &[f32], threshold: f32) -> Vec<f32> {
    let threshold = threshold.clamp(0.0, 0.999);
    let span = 1.0 - threshold;
    let mut out = vec![0.0f32; data.len()];
    for (src, dst) in data.chunks_exact(4).zip(out.chunks_exact_mut(4)) {
        let lum = luminance(src[0], src[1], src[2]);
        if lum > threshold {
            let scale = ((lum - threshold) / span).min(1.0);
            dst[0] = src[0] * scale;
            dst[1] = src[1] * scale;
            dst[2] = src[2] * scale;
            dst[3] = scale;
        }
    }
    out
}

/// Separable box blur (horizontal then vertical mean) over RGBA data.
fn box_blur(src: &[f32], w: usize, h: usize, radius: usize) -> Vec<f32> {
    let row_len = w * 4;

    let mut tmp = vec![0.0f32; src.len()];
    tmp.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        for x in 0..w {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius).min(w - 1);
            let inv_n = 1.0 / (x1 - x0 + 1) as f32;
            let mut acc = [0.0f32; 4];
            for xi in x0..=x1 {
                let i = (y * w + xi) * 4;
                for c in 0..4 {
                    acc[c] += src[i + c];
                }
            }
            for c in 0..4 {
                row[x * 4 + c] = acc[c] * inv_n;
            }
        }
    });

    let mut out = vec![0.0f32; src.len()];
    out.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius).min(h - 1);
        let inv_n = 1.0 / (y1 - y0 + 1) as f32;
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for yi in y0..=y1 {
                let i = (yi * w + x) * 4;
                for c in 0..4 {
                    acc[c] += tmp[i + c];
                }
            }
            for c in 0..4 {
                row[x * 4 + c] = acc[c] * inv_n;
            }
        }
    });

    out
}

/// Halve resolution by nearest-pixel sampling.
fn downsample_nearest(src: &[f32], src_w: usize, dst_w: usize, dst_h: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; dst_w * dst_h * 4];
    for y in 0..dst_h {
        for x in 0..dst_w {
            let si = ((y * 2) * src_w + x * 2) * 4;
            let di = (y * dst_w + x) * 4;
            out[di..di + 4].copy_from_slice(&src[si..si + 4]);
        }
    }
    out
}

/// Bilinearly sample a pyramid level at the position corresponding to
/// full-resolution pixel `(x, y)`.
#[inline]
fn sample_bilinear(
    buffer: &[f32],
    lw: usize,
    lh: usize,
    x: usize,
    y: usize,
    full_w: usize,
    full_h: usize,
) -> [f32; 4] {
    let fx = ((x as f32 + 0.5) * lw as f32 / full_w as f32 - 0.5).max(0.0);
    let fy = ((y as f32 + 0.5) * lh as f32 / full_h as f32 - 0.5).max(0.0);

    let x0 = (fx as usize).min(lw - 1);
    let y0 = (fy as usize).min(lh - 1);
    let x1 = (x0 + 1).min(lw - 1);
    let y1 = (y0 + 1).min(lh - 1);
    let tx = fx - x0 as f32;
    let ty = fy - y0 as f32;

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        let p00 = buffer[(y0 * lw + x0) * 4 + c];
        let p10 = buffer[(y0 * lw + x1) * 4 + c];
        let p01 = buffer[(y1 * lw + x0) * 4 + c];
        let p11 = buffer[(y1 * lw + x1) * 4 + c];
        let top = p00 + (p10 - p00) * tx;
        let bottom = p01 + (p11 - p01) * tx;
        out[c] = top + (bottom - top) * ty;
    }
    out
}
