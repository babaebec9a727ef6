//! Film profile model
//!
//! The fully-resolved, immutable calibration data a `SimulationEngine` is
//! built from. Optional document fields are resolved to concrete defaults
//! at the load boundary (`crate::profiles`), so nothing downstream has to
//! re-check them.

use serde::{Deserialize, Serialize};

use crate::math::CurvePoint;

/// Film response class. Exactly three variants are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilmType {
    /// Color negative (C-41 style): develops an inverted, orange-masked image.
    Negative,
    /// Reversal / slide (E-6 style): develops a positive image directly.
    Reversal,
    /// Black-and-white negative: inverted, no color dyes.
    BwNegative,
}

impl FilmType {
    /// Whether the scanned response must be inverted to yield a positive.
    #[inline]
    pub fn is_inverted(self) -> bool {
        !matches!(self, FilmType::Reversal)
    }

    /// Whether the stock carries no color information.
    #[inline]
    pub fn is_monochrome(self) -> bool {
        matches!(self, FilmType::BwNegative)
    }
}

/// HDR-to-display compression curve selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMode {
    /// Narkowicz analytic ACES approximation.
    Aces,
    /// Reinhard with configurable white point.
    Reinhard,
    /// Clamp and gamma-encode only.
    Simple,
    /// Alias of `Simple`; also selects no percentile clipping during
    /// normalization derivation.
    Linear,
}

impl std::str::FromStr for ToneMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aces" => Ok(ToneMode::Aces),
            "reinhard" => Ok(ToneMode::Reinhard),
            "simple" => Ok(ToneMode::Simple),
            "linear" => Ok(ToneMode::Linear),
            other => Err(format!("Unknown tone mapping mode: {}", other)),
        }
    }
}

/// One wavelength sample of the spectral dye-density table.
///
/// `c`/`m`/`y` are the per-dye density contributions at this wavelength for
/// unit dye amount; `base` is the fixed base (mask) density term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralRow {
    pub wavelength: f32,
    pub c: f32,
    pub m: f32,
    pub y: f32,
    pub base: f32,
}

/// Fully-resolved film profile.
///
/// Immutable once loaded; a `SimulationEngine` borrows it for its whole
/// lifetime and derives its calibration from it exactly once.
#[derive(Debug, Clone)]
pub struct FilmProfile {
    /// Stock name, e.g. "Kodak Portra 400".
    pub name: String,

    /// Development process, e.g. "C-41", "E-6", "BW".
    pub process: String,

    /// Box speed. Drives grain amplitude.
    pub iso: f32,

    /// Explicit film type, when the document declares one. `None` means
    /// the type is inferred from process/name during calibration.
    pub film_type: Option<FilmType>,

    /// RGB -> raw-sensor sensitivity matrix (row-major). Identity when the
    /// document omits it.
    pub sensitivity: [[f32; 3]; 3],

    /// Spectral dye-density table, ordered by wavelength. `None` degrades
    /// the scan stage to pure per-channel Beer-Lambert.
    pub dye_density: Option<Vec<SpectralRow>>,

    /// Dye-coupling crosstalk matrix (row-major). `None` or identity means
    /// no coupling is applied.
    pub dye_coupling: Option<[[f32; 3]; 3]>,

    /// Per-channel H&D curves (red, green, blue). Always non-empty and
    /// monotonic in x; the loader rejects anything else.
    pub curves: [Vec<CurvePoint>; 3],

    /// Tone-mapping curve to use for display.
    pub tone_mode: ToneMode,

    /// Reinhard white point.
    pub white_point: f32,
}
