//! Simulation engine
//!
//! Owns the per-profile calibration and exposes the four-stage physics
//! transform: expose -> develop -> scan -> invert. Calibration happens once
//! at construction; every per-pixel operation is a pure function of the
//! pixel value and the read-only calibration state, so a single engine can
//! be shared across parallel workers.

mod calibration;


pub use calibration::Calibration;

use crate::math::{interpolate, mat3_mul_vec3};
use crate::models::{FilmProfile, FilmType};

/// Floor applied before any log10 to keep exposure finite.
const LOG_FLOOR: f32 = 1e-10;

/// Floor for transmittance denominators during inversion.
const TRANSMITTANCE_FLOOR: f32 = 1e-6;

/// Status-M densitometer band centers (red, green, blue), in nm.
const STATUS_M_CENTERS: [f32; 3] = [650.0, 540.0, 440.0];

/// Gaussian width of the Status-M band approximation, in nm.
const STATUS_M_SIGMA: f32 = 20.0;

/// Calibrated film simulation engine.
///
/// Construction runs the full calibration sequence (sensitivity alignment,
/// normalization, base-fog extraction, film-type inference, base response).
/// Re-profiling means constructing a new engine.
pub struct SimulationEngine<'a> {
    profile: &'a FilmProfile,
    calibration: Calibration,
}

impl<'a> SimulationEngine<'a> {
    /// Calibrate an engine for a loaded profile.
    pub fn new(profile: &'a FilmProfile) -> Self {
        let calibration = Calibration::from_profile(profile);
        Self {
            profile,
            calibration,
        }
    }

    /// Build an engine around an already-computed calibration. Used by the
    /// calibration sequence itself to probe the unexposed base response.
    pub(super) fn with_calibration(profile: &'a FilmProfile, calibration: Calibration) -> Self {
        Self {
            profile,
            calibration,
        }
    }

    /// The profile this engine was calibrated for.
    pub fn profile(&self) -> &FilmProfile {
        self.profile
    }

    /// The immutable calibration state derived at construction.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Inferred (or explicitly declared) film type.
    pub fn film_type(&self) -> FilmType {
        self.calibration.film_type
    }

    /// Stage 1: scene light to per-channel log-exposure.
    ///
    /// Applies the sensitivity matrix, then the calibrated normalization
    /// scale, the per-channel sensitivity offset (log10 units) and the
    /// exposure compensation (stops), flooring before the log.
    pub fn expose(&self, rgb: [f32; 3], ev_comp: f32) -> [f32; 3] {
        let raw = mat3_mul_vec3(&self.profile.sensitivity, rgb);
        let gain = 2.0_f32.powf(ev_comp);
        let mut log_exposure = [0.0f32; 3];
        for c in 0..3 {
            let scaled = raw[c]
                * self.calibration.normalization_scale[c]
                * 10.0_f32.powf(self.calibration.sensitivity_offsets[c])
                * gain;
            log_exposure[c] = scaled.max(LOG_FLOOR).log10();
        }
        log_exposure
    }

    /// Stage 2: log-exposure to dye density above base fog.
    ///
    /// Looks each channel up on its H&D curve, subtracts the channel's
    /// dMin and floors at zero.
    pub fn develop(&self, log_exposure: [f32; 3]) -> [f32; 3] {
        let mut density = [0.0f32; 3];
        for c in 0..3 {
            let d = interpolate(log_exposure[c], &self.profile.curves[c]);
            density[c] = (d - self.calibration.d_min[c]).max(0.0);
        }
        density
    }

    /// Stage 3: CMY density to scanned RGB transmittance.
    ///
    /// Without a spectral dye table this is pure Beer-Lambert,
    /// `10^-density` per channel. With one, transmittance is integrated
    /// across the table's wavelengths under Gaussian Status-M band
    /// responsivities, which reproduces orange mask and inter-layer
    /// crosstalk physically.
    pub fn scan(&self, density: [f32; 3]) -> [f32; 3] {
        let Some(table) = self.profile.dye_density.as_deref() else {
            return beer_lambert(density);
        };
        if table.is_empty() {
            return beer_lambert(density);
        }

        let mut sums = [0.0f32; 3];
        let mut weights = [0.0f32; 3];

        for row in table {
            let total =
                density[0] * row.c + density[1] * row.m + density[2] * row.y + row.base;
            let transmittance = 10.0_f32.powf(-total);

            for band in 0..3 {
                let delta = (row.wavelength - STATUS_M_CENTERS[band]) / STATUS_M_SIGMA;
                let w = (-0.5 * delta * delta).exp();
                sums[band] += w * transmittance;
                weights[band] += w;
            }
        }

        let fallback = beer_lambert(density);
        let mut scanned = [0.0f32; 3];
        for band in 0..3 {
            // A table with no samples near a band center gives that band no
            // weight; fall back to Beer-Lambert for it.
            scanned[band] = if weights[band] > 1e-6 {
                sums[band] / weights[band]
            } else {
                fallback[band]
            };
        }
        scanned
    }

    /// Stage 4: scanned transmittance to positive density.
    ///
    /// Divides out the unexposed base response and takes the negative log.
    /// The orchestrator skips this entirely for reversal film, whose
    /// transmittance is already a positive image.
    pub fn invert(&self, scanned: [f32; 3], gamma: f32) -> [f32; 3] {
        let mut density = [0.0f32; 3];
        for c in 0..3 {
            let base = self.calibration.base_response[c].max(TRANSMITTANCE_FLOOR);
            let ratio = (scanned[c] / base).max(TRANSMITTANCE_FLOOR);
            density[c] = -ratio.log10() * gamma;
        }
        density
    }

    /// Canonical one-shot transform: `scan(develop(expose(rgb, ev)))`.
    ///
    /// Inversion is a separate, film-type-conditional step applied by the
    /// caller.
    #[inline]
    pub fn process_pixel(&self, rgb: [f32; 3], ev_comp: f32) -> [f32; 3] {
        self.scan(self.develop(self.expose(rgb, ev_comp)))
    }
}

/// Pure per-channel Beer-Lambert transmittance.
#[inline]
fn beer_lambert(density: [f32; 3]) -> [f32; 3] {
    [
        10.0_f32.powf(-density[0]),
        10.0_f32.powf(-density[1]),
        10.0_f32.powf(-density[2]),
    ]
}
