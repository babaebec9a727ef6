//! Density-space effects
//!
//! Per-pixel effects applied between the physics transform and
//! normalization: dye-layer crosstalk and red halation.

mod dye_coupling;
mod halation;

pub use dye_coupling::{apply_coupling_to_density, apply_coupling_to_transmittance};
pub use halation::apply_halation;
