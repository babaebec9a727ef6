//! Emulsion Core Library
//!
//! Physically-motivated simulation of analog photographic film response.
//! Takes a linear-light RGBA buffer and an immutable film profile, and
//! produces a display-ready 8-bit "scanned film" image through a
//! calibrated expose/develop/scan/invert physics model followed by
//! image-wide post-processing (dye crosstalk, halation, pyramid bloom,
//! clustered grain, tone mapping, adaptive normalization).

pub mod bloom;
pub mod color;
pub mod config;
pub mod effects;
pub mod engine;
pub mod grain;
pub mod math;
pub mod models;
pub mod pipeline;
pub mod profiles;
pub mod tone_mapping;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use engine::{Calibration, SimulationEngine};
pub use models::{
    BloomParams, FilmProfile, FilmType, GrainParams, HalationParams, ProcessOptions, SpectralRow,
    ToneMode,
};
pub use pipeline::{
    compute_auto_exposure, process_image, LinearImage, NormalizationParams, PipelineSummary,
    ProcessedImage,
};
pub use profiles::{load_film_profile, parse_film_profile};
