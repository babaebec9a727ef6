//! Color space helpers
//!
//! HSL round-trips for saturation restoration, plus the luminance and
//! HSV-style saturation measures used by the pipeline statistics pass.

mod hsl;

pub use hsl::{hsl_to_rgb, rgb_to_hsl, Hsl};

/// Rec. 709 relative luminance of a linear RGB triple.
#[inline]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// HSV-style saturation: `(max - min) / max`, 0 for black.
///
/// Used only as a scene statistic (pass-1 saturation tracking); the
/// actual saturation boost works through the HSL round-trip.
#[inline]
pub fn saturation(r: f32, g: f32, b: f32) -> f32 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max <= 1e-6 {
        0.0
    } else {
        (max - min) / max
    }
}

/// Scale a pixel's HSL saturation by `factor`, clamping S to [0, 1].
///
/// Hue and lightness are preserved. A factor of 1.0 is an exact no-op for
/// achromatic inputs and a near no-op elsewhere (one HSL round-trip).
#[inline]
pub fn boost_saturation(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    let mut hsl = rgb_to_hsl(r, g, b);
    hsl.s = (hsl.s * factor).clamp(0.0, 1.0);
    hsl_to_rgb(hsl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_white_is_one() {
        assert!((luminance(1.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_saturation_gray_is_zero() {
        assert_eq!(saturation(0.5, 0.5, 0.5), 0.0);
        assert_eq!(saturation(0.0, 0.0, 0.0), 0.0, "black is defined as 0");
    }

    #[test]
    fn test_saturation_pure_color_is_one() {
        assert!((saturation(1.0, 0.0, 0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_boost_saturation_unit_factor_preserves_gray() {
        let (r, g, b) = boost_saturation(0.4, 0.4, 0.4, 1.0);
        assert!((r - 0.4).abs() < 1e-6);
        assert!((g - 0.4).abs() < 1e-6);
        assert!((b - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_boost_saturation_increases_spread() {
        let before = saturation(0.6, 0.5, 0.4);
        let (r, g, b) = boost_saturation(0.6, 0.5, 0.4, 2.0);
        let after = saturation(r, g, b);
        assert!(
            after > before,
            "saturation should increase: {} -> {}",
            before,
            after
        );
    }
}
