//! Shared test fixtures: synthetic film profiles and image buffers.

use crate::math::{CurvePoint, IDENTITY_3X3};
use crate::models::{FilmProfile, FilmType, ToneMode};

/// Straight-line H&D curve between two control points.
pub(crate) fn linear_curve(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<CurvePoint> {
    vec![CurvePoint { x: x0, y: y0 }, CurvePoint { x: x1, y: y1 }]
}

/// Color negative profile with slope-0.65 curves and dMin 0.2. The green
/// and blue curves are shifted right, so calibration must derive non-zero
/// offsets for them.
pub(crate) fn negative_profile() -> FilmProfile {
    FilmProfile {
        name: "Test Negative 200".to_string(),
        process: "C-41".to_string(),
        iso: 200.0,
        film_type: Some(FilmType::Negative),
        sensitivity: IDENTITY_3X3,
        dye_density: None,
        dye_coupling: None,
        curves: [
            linear_curve(-3.0, 0.2, 1.0, 2.8),
            linear_curve(-2.8, 0.2, 1.2, 2.8),
            linear_curve(-2.6, 0.2, 1.4, 2.8),
        ],
        tone_mode: ToneMode::Aces,
        white_point: 2.0,
    }
}

/// Reversal profile with falling curves. Its zero-exposure response is
/// nearly opaque, which exercises the degenerate-base substitution.
pub(crate) fn reversal_profile() -> FilmProfile {
    FilmProfile {
        name: "Test Slide 100".to_string(),
        process: "E-6".to_string(),
        iso: 100.0,
        film_type: Some(FilmType::Reversal),
        sensitivity: IDENTITY_3X3,
        dye_density: None,
        dye_coupling: None,
        curves: [
            linear_curve(-3.0, 2.8, 1.0, 0.2),
            linear_curve(-3.0, 2.8, 1.0, 0.2),
            linear_curve(-3.0, 2.8, 1.0, 0.2),
        ],
        tone_mode: ToneMode::Aces,
        white_point: 2.0,
    }
}

/// Black-and-white negative profile.
pub(crate) fn bw_profile() -> FilmProfile {
    let mut profile = negative_profile();
    profile.name = "Test Pan 400".to_string();
    profile.process = "BW".to_string();
    profile.iso = 400.0;
    profile.film_type = Some(FilmType::BwNegative);
    profile.curves = [
        linear_curve(-3.0, 0.1, 1.0, 2.6),
        linear_curve(-3.0, 0.1, 1.0, 2.6),
        linear_curve(-3.0, 0.1, 1.0, 2.6),
    ];
    profile
}

/// Interleaved RGBA gradient buffer with full alpha.
pub(crate) fn gradient_image(width: u32, height: u32) -> Vec<f32> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 / width.max(1) as f32;
            let fy = y as f32 / height.max(1) as f32;
            data.push(0.05 + 0.9 * fx);
            data.push(0.05 + 0.9 * fy);
            data.push(0.05 + 0.9 * (fx + fy) / 2.0);
            data.push(1.0);
        }
    }
    data
}
