//! Dye-layer crosstalk
//!
//! Applies a 3x3 coupling matrix to CMY density triples. The matrix uses
//! the crate's single row-major convention; the profile loader already
//! rejected any malformed document form.

use crate::math::{is_identity, mat3_mul_vec3};

/// Floor for transmittance before converting to density.
const TRANSMITTANCE_FLOOR: f32 = 1e-6;

/// Apply a coupling matrix to a density triple: `d' = M * d`.
///
/// An identity matrix is a defined no-op and returns the input bit-for-bit.
#[inline]
pub fn apply_coupling_to_density(density: [f32; 3], matrix: &[[f32; 3]; 3]) -> [f32; 3] {
    if is_identity(matrix) {
        return density;
    }
    mat3_mul_vec3(matrix, density)
}

/// Apply a coupling matrix to a transmittance triple.
///
/// Converts to density with a clamped log, applies the matrix, and
/// converts back. Used when the working value is transmittance (reversal
/// film) rather than density.
#[inline]
pub fn apply_coupling_to_transmittance(
    transmittance: [f32; 3],
    matrix: &[[f32; 3]; 3],
) -> [f32; 3] {
    if is_identity(matrix) {
        return transmittance;
    }
    let density = [
        -transmittance[0].max(TRANSMITTANCE_FLOOR).log10(),
        -transmittance[1].max(TRANSMITTANCE_FLOOR).log10(),
        -transmittance[2].max(TRANSMITTANCE_FLOOR).log10(),
    ];
    let coupled = mat3_mul_vec3(matrix, density);
    [
        10.0_f32.powf(-coupled[0]),
        10.0_f32.powf(-coupled[1]),
        10.0_f32.powf(-coupled[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::IDENTITY_3X3;

    #[test]
    fn test_identity_coupling_is_bitwise_noop() {
        let cases = [
            [0.0, 0.0, 0.0],
            [1.234_567, 0.000_001, 2.699_999],
            [f32::MIN_POSITIVE, 1.0, 3.0],
        ];
        for d in cases {
            assert_eq!(apply_coupling_to_density(d, &IDENTITY_3X3), d);
        }
    }

    #[test]
    fn test_identity_transmittance_coupling_is_bitwise_noop() {
        let t = [0.123_456_7, 0.999_999, 0.000_01];
        assert_eq!(apply_coupling_to_transmittance(t, &IDENTITY_3X3), t);
    }

    #[test]
    fn test_coupling_mixes_layers() {
        let m = [[1.0, 0.1, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let out = apply_coupling_to_density([1.0, 1.0, 1.0], &m);
        assert!((out[0] - 1.1).abs() < 1e-6, "magenta leaks into cyan");
        assert!((out[1] - 1.0).abs() < 1e-6);
        assert!((out[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_transmittance_coupling_round_trips_through_density() {
        // A pure diagonal scale in density space is a power law in
        // transmittance space.
        let m = [[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let t = [0.1, 0.5, 0.9];
        let out = apply_coupling_to_transmittance(t, &m);
        assert!((out[0] - 0.01).abs() < 1e-4, "density doubling squares transmittance");
        assert!((out[1] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_transmittance_coupling_guards_zero() {
        let m = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.1]];
        let out = apply_coupling_to_transmittance([0.0, 0.5, 0.5], &m);
        assert!(out.iter().all(|v| v.is_finite()));
    }
}
