//! HSL (Hue-Saturation-Lightness) color space conversions

/// HSL color representation
/// - H (hue): 0.0-360.0 degrees
/// - S (saturation): 0.0-1.0
/// - L (lightness): 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

/// Convert RGB to HSL
///
/// Input: RGB values in range 0.0-1.0
/// Output: HSL where H is 0.0-360.0, S and L are 0.0-1.0
#[inline]
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> Hsl {
    let r = r.clamp(0.0, 1.0);
    let g = g.clamp(0.0, 1.0);
    let b = b.clamp(0.0, 1.0);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let l = (max + min) / 2.0;

    // Achromatic case
    if delta < 1e-6 {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let s = if l < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    let h = if (max - r).abs() < 1e-6 {
        let mut h = (g - b) / delta;
        if g < b {
            h += 6.0;
        }
        h * 60.0
    } else if (max - g).abs() < 1e-6 {
        ((b - r) / delta + 2.0) * 60.0
    } else {
        ((r - g) / delta + 4.0) * 60.0
    };

    Hsl { h: h % 360.0, s, l }
}

/// Convert HSL to RGB
///
/// Input: HSL where H is 0.0-360.0, S and L are 0.0-1.0
/// Output: RGB values in range 0.0-1.0
#[inline]
pub fn hsl_to_rgb(hsl: Hsl) -> (f32, f32, f32) {
    let Hsl { h, s, l } = hsl;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    // Achromatic case
    if s < 1e-6 {
        return (l, l, l);
    }

    let h = h % 360.0;
    let h = if h < 0.0 { h + 360.0 } else { h };

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h_norm = h / 360.0;

    let r = hue_to_rgb(p, q, h_norm + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h_norm);
    let b = hue_to_rgb(p, q, h_norm - 1.0 / 3.0);

    (r, g, b)
}

#[inline]
fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hsl_round_trip() {
        let cases = [
            (0.8, 0.2, 0.1),
            (0.1, 0.9, 0.4),
            (0.2, 0.3, 0.7),
            (0.5, 0.5, 0.5),
            (0.0, 0.0, 0.0),
            (1.0, 1.0, 1.0),
        ];
        for (r, g, b) in cases {
            let hsl = rgb_to_hsl(r, g, b);
            let (r2, g2, b2) = hsl_to_rgb(hsl);
            assert!(
                (r - r2).abs() < 1e-4 && (g - g2).abs() < 1e-4 && (b - b2).abs() < 1e-4,
                "round trip failed for ({}, {}, {}) -> ({}, {}, {})",
                r,
                g,
                b,
                r2,
                g2,
                b2
            );
        }
    }

    #[test]
    fn test_primary_hues() {
        assert!((rgb_to_hsl(1.0, 0.0, 0.0).h - 0.0).abs() < 0.5);
        assert!((rgb_to_hsl(0.0, 1.0, 0.0).h - 120.0).abs() < 0.5);
        assert!((rgb_to_hsl(0.0, 0.0, 1.0).h - 240.0).abs() < 0.5);
    }

    #[test]
    fn test_achromatic_has_zero_saturation() {
        let hsl = rgb_to_hsl(0.42, 0.42, 0.42);
        assert_eq!(hsl.s, 0.0);
        assert!((hsl.l - 0.42).abs() < 1e-6);
    }
}
