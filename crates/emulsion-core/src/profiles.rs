//! Film profile loading and validation
//!
//! Profiles arrive as JSON documents from an external store. All optional
//! fields are resolved to concrete defaults here, and all structural
//! invariants (non-empty monotonic curves, matrix shapes) are validated
//! once, so per-pixel code never re-checks them.

use std::path::Path;

use serde::Deserialize;

use crate::math::CurvePoint;
use crate::models::{FilmProfile, FilmType, SpectralRow, ToneMode};

/// On-disk / on-wire profile document. Field optionality matches what
/// real profile stores contain; resolution to `FilmProfile` fills the gaps.
#[derive(Debug, Deserialize)]
struct ProfileDocument {
    name: String,
    #[serde(default)]
    process: Option<String>,
    #[serde(default)]
    iso: Option<f32>,
    #[serde(default)]
    film_type: Option<FilmType>,
    #[serde(default)]
    physics: Option<PhysicsDocument>,
    sensitometry: SensitometryDocument,
    #[serde(default)]
    rendering: Option<RenderingDocument>,
}

#[derive(Debug, Default, Deserialize)]
struct PhysicsDocument {
    /// Row-major RGB -> raw sensitivity matrix.
    #[serde(default)]
    sensitivity: Option<[[f32; 3]; 3]>,

    /// Dye-coupling crosstalk matrix as a flat row-major array. Must hold
    /// exactly 9 elements when present.
    #[serde(default)]
    dye_coupling: Option<Vec<f32>>,

    /// Spectral dye-density rows: `[wavelength, C, M, Y]` or
    /// `[wavelength, C, M, Y, base]`.
    #[serde(default)]
    dye_density: Option<Vec<Vec<f32>>>,
}

#[derive(Debug, Deserialize)]
struct SensitometryDocument {
    red: Vec<CurvePoint>,
    green: Vec<CurvePoint>,
    blue: Vec<CurvePoint>,
}

#[derive(Debug, Default, Deserialize)]
struct RenderingDocument {
    #[serde(default)]
    tone_mode: Option<ToneMode>,
    #[serde(default)]
    white_point: Option<f32>,
}

/// Parse and validate a film profile from a JSON document string.
pub fn parse_film_profile(json: &str) -> Result<FilmProfile, String> {
    let doc: ProfileDocument =
        serde_json::from_str(json).map_err(|e| format!("Failed to parse profile JSON: {}", e))?;
    resolve_profile(doc)
}

/// Load a film profile from a JSON file.
pub fn load_film_profile<P: AsRef<Path>>(path: P) -> Result<FilmProfile, String> {
    let contents = std::fs::read_to_string(path.as_ref())
        .map_err(|e| format!("Failed to read profile file: {}", e))?;
    parse_film_profile(&contents)
}

/// Resolve a parsed document into a fully-populated `FilmProfile`.
fn resolve_profile(doc: ProfileDocument) -> Result<FilmProfile, String> {
    let curves = [
        validate_curve(doc.sensitometry.red, "red")?,
        validate_curve(doc.sensitometry.green, "green")?,
        validate_curve(doc.sensitometry.blue, "blue")?,
    ];

    let physics = doc.physics.unwrap_or_default();

    let sensitivity = physics.sensitivity.unwrap_or(crate::math::IDENTITY_3X3);

    let dye_coupling = match physics.dye_coupling {
        None => None,
        Some(flat) => Some(coupling_from_flat(&flat)?),
    };

    let dye_density = match physics.dye_density {
        None => None,
        Some(rows) => Some(validate_dye_density(rows)?),
    };

    let rendering = doc.rendering.unwrap_or_default();

    Ok(FilmProfile {
        name: doc.name,
        process: doc.process.unwrap_or_else(|| "C-41".to_string()),
        iso: doc.iso.unwrap_or(200.0),
        film_type: doc.film_type,
        sensitivity,
        dye_density,
        dye_coupling,
        curves,
        tone_mode: rendering.tone_mode.unwrap_or(ToneMode::Aces),
        white_point: rendering.white_point.unwrap_or(2.0),
    })
}

/// Validate that a sensitometry curve is non-empty and non-decreasing in x.
fn validate_curve(curve: Vec<CurvePoint>, channel: &str) -> Result<Vec<CurvePoint>, String> {
    if curve.is_empty() {
        return Err(format!("Sensitometry curve for {} channel is empty", channel));
    }
    for window in curve.windows(2) {
        if window[1].x < window[0].x {
            return Err(format!(
                "Sensitometry curve for {} channel is not monotonic in x ({} after {})",
                channel, window[1].x, window[0].x
            ));
        }
    }
    Ok(curve)
}

/// Convert the document's flat row-major dye-coupling array into the
/// crate's nested row-major matrix form. Any element count other than 9
/// is a hard error.
fn coupling_from_flat(flat: &[f32]) -> Result<[[f32; 3]; 3], String> {
    if flat.len() != 9 {
        return Err(format!(
            "Dye coupling matrix must have exactly 9 elements, got {}",
            flat.len()
        ));
    }
    Ok([
        [flat[0], flat[1], flat[2]],
        [flat[3], flat[4], flat[5]],
        [flat[6], flat[7], flat[8]],
    ])
}

/// Validate spectral rows and resolve the optional base-density column.
fn validate_dye_density(rows: Vec<Vec<f32>>) -> Result<Vec<SpectralRow>, String> {
    let mut table = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        match row.len() {
            4 => table.push(SpectralRow {
                wavelength: row[0],
                c: row[1],
                m: row[2],
                y: row[3],
                base: 0.0,
            }),
            5 => table.push(SpectralRow {
                wavelength: row[0],
                c: row[1],
                m: row[2],
                y: row[3],
                base: row[4],
            }),
            n => {
                return Err(format!(
                    "Dye density row {} must have 4 or 5 columns, got {}",
                    i, n
                ))
            }
        }
    }
    Ok(table)
}
