//! Tone mapping
//!
//! Pure per-channel HDR-to-display compression curves. Every mode includes
//! the output gamma encoding; no separate encode step is layered on top.

use crate::models::ToneMode;

/// Display gamma exponent applied by every mode.
const DISPLAY_GAMMA: f32 = 1.0 / 2.2;

/// Map one linear channel value to display range, gamma-encoded.
#[inline]
pub fn tone_map(x: f32, mode: ToneMode, white_point: f32) -> f32 {
    match mode {
        ToneMode::Aces => aces(x),
        ToneMode::Reinhard => reinhard(x, white_point),
        ToneMode::Simple | ToneMode::Linear => gamma_encode(x.clamp(0.0, 1.0)),
    }
}

/// Narkowicz analytic ACES approximation, clamped and gamma-encoded.
#[inline]
fn aces(x: f32) -> f32 {
    let mapped = (x * (2.51 * x + 0.03)) / (x * (2.43 * x + 0.59) + 0.14);
    gamma_encode(mapped.clamp(0.0, 1.0))
}

/// Reinhard `L / (1 + L / whitePoint)`, gamma-encoded.
#[inline]
fn reinhard(x: f32, white_point: f32) -> f32 {
    let wp = white_point.max(1e-6);
    let mapped = (x.max(0.0)) / (1.0 + x.max(0.0) / wp);
    gamma_encode(mapped.clamp(0.0, 1.0))
}

#[inline]
fn gamma_encode(x: f32) -> f32 {
    x.powf(DISPLAY_GAMMA)
}
