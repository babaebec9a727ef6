//! Processing options
//!
//! User-selected parameters for one pipeline invocation. Everything here
//! has a sensible default; the surrounding application only overrides what
//! its controls expose.

use serde::{Deserialize, Serialize};

use super::ToneMode;

/// Pyramid bloom parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloomParams {
    /// Overall bloom intensity. Zero or negative disables bloom entirely
    /// (the buffer is returned untouched).
    pub strength: f32,

    /// Luminance threshold above which pixels contribute to the highlight
    /// buffer.
    pub threshold: f32,

    /// Per-level composite weights. The number of pyramid levels is the
    /// length of this vector.
    pub weights: Vec<f32>,

    /// Base blur radius in pixels; each level blurs with radius
    /// `radius * (level + 1)` at its own resolution.
    pub radius: f32,
}

impl Default for BloomParams {
    fn default() -> Self {
        Self {
            strength: 0.3,
            threshold: 0.8,
            weights: vec![0.5, 0.35, 0.25, 0.18, 0.12, 0.08],
            radius: 2.0,
        }
    }
}

/// Red halation parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HalationParams {
    /// Mean-luminance threshold above which highlights start to halate.
    pub threshold: f32,

    /// Red-channel boost per unit of highlight fraction.
    pub strength: f32,

    /// Nominal scatter radius. Carried for profile compatibility; the
    /// single-pass approximation performs no spatial blur, so this is
    /// currently decorative.
    pub radius: f32,
}

impl Default for HalationParams {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            strength: 0.15,
            radius: 8.0,
        }
    }
}

/// Clustered film grain parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GrainParams {
    /// User grain multiplier on top of the ISO-derived base amplitude.
    /// Zero disables grain.
    pub strength: f32,

    /// Hash salt so repeated runs can decorrelate (or tests can pin) the
    /// grain field.
    pub seed: u32,
}

impl Default for GrainParams {
    fn default() -> Self {
        Self {
            strength: 1.0,
            seed: 0,
        }
    }
}

/// Parameters for one full pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessOptions {
    /// Exposure compensation in stops, additive with any auto-exposure bias.
    pub ev_compensation: f32,

    /// Enable log-average auto-exposure metering on the input buffer.
    pub auto_exposure: bool,

    /// Preserve the scene's original exposure: fixed normalization ranges
    /// instead of adaptive percentile clipping.
    pub preserve_exposure: bool,

    /// Override the profile's tone-mapping mode.
    pub tone_mode: Option<ToneMode>,

    /// Bloom configuration.
    pub bloom: BloomParams,

    /// Halation configuration.
    pub halation: HalationParams,

    /// Grain configuration.
    pub grain: GrainParams,

    /// Salt for the output dither hash, so tests can fix the dither field.
    pub dither_seed: u32,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            ev_compensation: 0.0,
            auto_exposure: false,
            preserve_exposure: false,
            tone_mode: None,
            bloom: BloomParams::default(),
            halation: HalationParams::default(),
            grain: GrainParams::default(),
            dither_seed: 0,
        }
    }
}
