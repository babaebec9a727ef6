//! Curve and matrix math primitives
//!
//! Piecewise-linear curve interpolation and 3x3 matrix-vector transforms.
//! These are pure, stateless functions reused by every pipeline stage.

use serde::{Deserialize, Serialize};

/// One control point of a calibration curve.
///
/// For sensitometry (H&D) curves, `x` is log-exposure and `y` is density.
/// Points within a curve are ordered by `x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
}

/// Evaluate a curve at `x` using clamped piecewise-linear interpolation.
///
/// Outside the curve's domain the nearest endpoint's `y` is returned
/// exactly. Inside, the value is linearly interpolated between the first
/// bracketing interval `[p[i].x, p[i+1].x)` found by linear scan.
///
/// An empty curve evaluates to 0.0; a single-point curve to that point's
/// `y` for all `x`.
pub fn interpolate(x: f32, curve: &[CurvePoint]) -> f32 {
    let Some(first) = curve.first() else {
        return 0.0;
    };
    let last = curve[curve.len() - 1];

    if x <= first.x {
        return first.y;
    }
    if x >= last.x {
        return last.y;
    }

    for window in curve.windows(2) {
        let (a, b) = (window[0], window[1]);
        if x >= a.x && x < b.x {
            let span = b.x - a.x;
            if span <= 0.0 {
                // Degenerate interval (duplicate x); take the left point.
                return a.y;
            }
            let t = (x - a.x) / span;
            return a.y + (b.y - a.y) * t;
        }
    }

    // Unreachable for ordered curves, but keep a defined answer.
    last.y
}

/// Multiply a row-major 3x3 matrix by a column vector.
///
/// `out[r] = sum_c m[r][c] * v[c]`. This is the single matrix convention
/// used throughout the crate; flat row-major arrays from profile documents
/// are converted to this nested form at the load boundary.
#[inline]
pub fn mat3_mul_vec3(m: &[[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// The 3x3 identity matrix.
pub const IDENTITY_3X3: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Check whether a matrix is exactly the identity.
///
/// Identity dye-coupling matrices are defined as a no-op and are skipped
/// by the effects stage without changing output.
#[inline]
pub fn is_identity(m: &[[f32; 3]; 3]) -> bool {
    *m == IDENTITY_3X3
}
