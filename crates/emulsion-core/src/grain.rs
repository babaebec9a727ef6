//! Clustered film grain
//!
//! Deterministic, spatially coherent noise applied after tone mapping,
//! where grain is perceptually visible. Amplitude follows an ISO power law
//! weighted by a midtone mask, and the noise field mixes a coarse-grid
//! hash (clumping) with a fine per-pixel hash (detail). No ambient RNG is
//! involved anywhere; the same coordinates, seed, and parameters always
//! reproduce the same grain.

use crate::color::luminance;
use crate::models::GrainParams;

/// Reference ISO for the amplitude power law.
const REFERENCE_ISO: f32 = 200.0;

/// Base grain amplitude at the reference ISO.
const BASE_AMPLITUDE: f32 = 0.05;

/// Coarse-grid / fine-detail mix weights.
const COARSE_WEIGHT: f32 = 0.3;
const FINE_WEIGHT: f32 = 0.7;

/// Apply grain to one display-range pixel at integer coordinates `(x, y)`.
///
/// `monochrome` applies one shared noise value to all three channels
/// (luminance-only grain, hue preserved); color mode draws a separately
/// salted value per channel. The result is clamped to [0, 1].
pub fn apply_grain(
    rgb: [f32; 3],
    x: u32,
    y: u32,
    iso: f32,
    monochrome: bool,
    params: &GrainParams,
) -> [f32; 3] {
    if params.strength <= 0.0 {
        return rgb;
    }

    let lum = luminance(rgb[0], rgb[1], rgb[2]);
    let amplitude = base_strength(iso) * params.strength * midtone_weight(lum);
    if amplitude <= 0.0 {
        return rgb;
    }

    let mut out = rgb;
    if monochrome {
        let n = clustered_noise(x, y, 0, params.seed);
        for c in 0..3 {
            out[c] = (out[c] + n * amplitude).clamp(0.0, 1.0);
        }
    } else {
        for c in 0..3 {
            let n = clustered_noise(x, y, c as u32, params.seed);
            out[c] = (out[c] + n * amplitude).clamp(0.0, 1.0);
        }
    }
    out
}

/// ISO-driven base amplitude: `(iso / 200)^0.6`, scaled.
#[inline]
pub fn base_strength(iso: f32) -> f32 {
    BASE_AMPLITUDE * (iso.max(1.0) / REFERENCE_ISO).powf(0.6)
}

/// Midtone visibility mask: peaks at L = 0.5, vanishes exactly at 0 and 1.
#[inline]
pub fn midtone_weight(lum: f32) -> f32 {
    (1.0 - ((lum - 0.5).abs() * 2.0).powf(1.2)).max(0.0)
}

/// Two-frequency noise in [-1, 1): coarse 2x2-cell hash for clumping plus
/// a fine per-pixel hash for detail.
#[inline]
fn clustered_noise(x: u32, y: u32, salt: u32, seed: u32) -> f32 {
    let coarse = hash_unit(x / 2, y / 2, salt, seed);
    let fine = hash_unit(x, y, salt.wrapping_add(101), seed);
    let mixed = COARSE_WEIGHT * coarse + FINE_WEIGHT * fine;
    mixed * 2.0 - 1.0
}

/// Deterministic integer-mixing hash of pixel coordinates, mapped to [0, 1).
/// Also used by the output dither so it stays reproducible under a seed.
#[inline]
pub(crate) fn hash_unit(x: u32, y: u32, salt: u32, seed: u32) -> f32 {
    let mut h = x
        .wrapping_mul(0x9E37_79B1)
        ^ y.wrapping_mul(0x85EB_CA77)
        ^ salt.wrapping_mul(0xC2B2_AE3D)
        ^ seed.wrapping_mul(0x27D4_EB2F);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7FEB_352D);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846C_A68B);
    h ^= h >> 16;
    (h >> 8) as f32 / (1u32 << 24) as f32
}
