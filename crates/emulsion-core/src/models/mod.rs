//! Data model types
//!
//! Film profiles (the immutable calibration input), processing options,
//! and the enums shared across the pipeline.

mod options;
mod profile;

pub use options::{BloomParams, GrainParams, HalationParams, ProcessOptions};
pub use profile::{FilmProfile, FilmType, SpectralRow, ToneMode};
