//! Red halation
//!
//! Single-pass approximation of light scattering back through the film
//! base: bright highlights bleed into the red-sensitive layer. Computes a
//! highlight fraction from the pixel's mean value and boosts the red
//! channel proportionally. No spatial blur is performed; the radius
//! parameter is carried for profile compatibility only.

use crate::models::HalationParams;

/// Boost the red channel in proportion to how far the pixel's mean value
/// sits above the halation threshold.
#[inline]
pub fn apply_halation(rgb: [f32; 3], params: &HalationParams) -> [f32; 3] {
    if params.strength <= 0.0 {
        return rgb;
    }

    let mean = (rgb[0] + rgb[1] + rgb[2]) / 3.0;
    let span = (1.0 - params.threshold).max(1e-6);
    let highlight = ((mean - params.threshold) / span).clamp(0.0, 1.0);
    if highlight <= 0.0 {
        return rgb;
    }

    [
        rgb[0] + highlight * params.strength,
        rgb[1],
        rgb[2],
    ]
}
