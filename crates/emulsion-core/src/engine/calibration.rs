//! Construction-time engine calibration
//!
//! Derives the immutable calibration state from a film profile: sensitivity
//! alignment via bisection on the H&D curves, white normalization, base-fog
//! extraction, film-type inference, and the unexposed base response.

use crate::math::{interpolate, mat3_mul_vec3, CurvePoint};
use crate::models::{FilmProfile, FilmType};

use super::SimulationEngine;

/// Bisection iteration count for sensitivity alignment.
const ALIGN_ITERATIONS: u32 = 15;

/// Log-exposure search bounds for sensitivity alignment.
const ALIGN_BOUNDS: (f32, f32) = (-4.0, 4.0);

/// Target density above base fog that defines channel alignment.
const ALIGN_TARGET_DENSITY: f32 = 1.0;

/// EV used to probe the film's response to zero exposure.
const BASE_PROBE_EV: f32 = -20.0;

/// Minimum plausible base-response channel value; anything below this is
/// degenerate and replaced by a type-appropriate default.
const BASE_VALIDITY_FLOOR: f32 = 0.01;

/// Substitute base response for reversal film (near-white).
const REVERSAL_DEFAULT_BASE: [f32; 3] = [0.95, 0.95, 0.95];

/// Substitute base response for negative and B&W film (orange-mask-like).
const NEGATIVE_DEFAULT_BASE: [f32; 3] = [0.45, 0.18, 0.06];

/// Immutable calibration state derived once from a profile.
///
/// Owned by exactly one `SimulationEngine` and never mutated after
/// construction, which is what makes the per-pixel operations safe to run
/// in parallel without locks.
#[derive(Debug, Clone)]
pub struct Calibration {
    /// Per-channel EV alignment in log10 units, relative to red (red is 0),
    /// so a neutral 18%-gray scene develops equal mid-density across
    /// channels.
    pub sensitivity_offsets: [f32; 3],

    /// Per-channel scale so scene white `[1,1,1]` exposes at raw ~= 1.0
    /// before any EV offset.
    pub normalization_scale: [f32; 3],

    /// Per-channel minimum curve density: base fog / film mask.
    pub d_min: [f32; 3],

    /// Inferred or explicitly declared film type.
    pub film_type: FilmType,

    /// Scanned RGB of zero exposure: the orange mask for negatives,
    /// near-white for reversal.
    pub base_response: [f32; 3],
}

impl Calibration {
    /// Run the full calibration sequence for a profile.
    pub fn from_profile(profile: &FilmProfile) -> Self {
        let d_min = [
            curve_min_density(&profile.curves[0]),
            curve_min_density(&profile.curves[1]),
            curve_min_density(&profile.curves[2]),
        ];

        let aligned = [
            align_channel(&profile.curves[0], d_min[0]),
            align_channel(&profile.curves[1], d_min[1]),
            align_channel(&profile.curves[2], d_min[2]),
        ];
        // Offsets are expressed relative to the red channel.
        let sensitivity_offsets = [0.0, aligned[1] - aligned[0], aligned[2] - aligned[0]];

        let normalization_scale = white_normalization(&profile.sensitivity);

        let film_type = infer_film_type(profile);

        let mut calibration = Self {
            sensitivity_offsets,
            normalization_scale,
            d_min,
            film_type,
            base_response: [1.0; 3],
        };

        // Probe the engine's own pipeline at effectively zero exposure to
        // find the unexposed response.
        let probe = SimulationEngine::with_calibration(profile, calibration.clone());
        let base = probe.process_pixel([0.0; 3], BASE_PROBE_EV);

        calibration.base_response = if base.iter().any(|&v| v < BASE_VALIDITY_FLOOR) {
            let default = match film_type {
                FilmType::Reversal => REVERSAL_DEFAULT_BASE,
                FilmType::Negative | FilmType::BwNegative => NEGATIVE_DEFAULT_BASE,
            };
            eprintln!(
                "[WARN] Degenerate base response {:?} for '{}'; using {:?}",
                base, profile.name, default
            );
            default
        } else {
            base
        };

        calibration
    }
}

/// Minimum y-value of a channel curve (dMin).
fn curve_min_density(curve: &[CurvePoint]) -> f32 {
    if curve.is_empty() {
        return 0.0;
    }
    curve.iter().map(|p| p.y).fold(f32::INFINITY, f32::min)
}

/// Find, by bisection, the log-exposure where a curve reaches
/// `d_min + ALIGN_TARGET_DENSITY`.
///
/// The bisection direction follows the curve's overall slope sign:
/// rising curves are the negative-film convention, falling curves the
/// reversal convention.
fn align_channel(curve: &[CurvePoint], d_min: f32) -> f32 {
    let target = d_min + ALIGN_TARGET_DENSITY;
    let rising = match (curve.first(), curve.last()) {
        (Some(first), Some(last)) => last.y >= first.y,
        _ => true,
    };

    let (mut lo, mut hi) = ALIGN_BOUNDS;
    for _ in 0..ALIGN_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let density = interpolate(mid, curve);
        if (density < target) == rising {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Per-channel inverse of the raw-sensor response to scene white, with a
/// zero response treated as 1.
fn white_normalization(sensitivity: &[[f32; 3]; 3]) -> [f32; 3] {
    let white = mat3_mul_vec3(sensitivity, [1.0, 1.0, 1.0]);
    let mut scale = [1.0f32; 3];
    for c in 0..3 {
        if white[c].abs() > f32::EPSILON {
            scale[c] = 1.0 / white[c];
        }
    }
    scale
}

/// Slide stock name fragments that imply reversal film.
const REVERSAL_STOCKS: &[&str] = &[
    "velvia",
    "provia",
    "ektachrome",
    "kodachrome",
    "sensia",
    "astia",
    "slide",
];

/// Black-and-white stock name fragments.
const BW_STOCKS: &[&str] = &[
    "hp5", "fp4", "tri-x", "trix", "t-max", "tmax", "delta", "acros", "pan",
];

/// Infer the film type: explicit profile field first, then the process
/// string, then stock-name substrings, defaulting to color negative.
fn infer_film_type(profile: &FilmProfile) -> FilmType {
    if let Some(explicit) = profile.film_type {
        return explicit;
    }

    let process = profile.process.to_uppercase();
    if process.contains("E-6") || process.contains("E6") {
        return FilmType::Reversal;
    }
    if process.contains("BW") || process.contains("B&W") {
        return FilmType::BwNegative;
    }

    let name = profile.name.to_lowercase();
    if REVERSAL_STOCKS.iter().any(|s| name.contains(s)) {
        return FilmType::Reversal;
    }
    if BW_STOCKS.iter().any(|s| name.contains(s)) {
        return FilmType::BwNegative;
    }

    FilmType::Negative
}
