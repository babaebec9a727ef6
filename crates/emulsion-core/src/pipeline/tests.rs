use super::*;
use crate::models::{BloomParams, GrainParams};
use crate::testing::{bw_profile, gradient_image, negative_profile, reversal_profile};

fn image(width: u32, height: u32) -> LinearImage {
    LinearImage {
        width,
        height,
        data: gradient_image(width, height),
    }
}

/// Flat 4x4 scene at `value` with a black pixel in the corner, so the
/// preserve-exposure black point anchors to zero instead of the scene value.
fn anchored_flat(value: f32) -> LinearImage {
    let mut data = [value, value, value, 1.0].repeat(16);
    data[0] = 0.0;
    data[1] = 0.0;
    data[2] = 0.0;
    LinearImage {
        width: 4,
        height: 4,
        data,
    }
}

fn quiet_options() -> ProcessOptions {
    ProcessOptions {
        bloom: BloomParams {
            strength: 0.0,
            ..BloomParams::default()
        },
        grain: GrainParams {
            strength: 0.0,
            seed: 0,
        },
        ..ProcessOptions::default()
    }
}

#[test]
fn test_output_shape_matches_input() {
    let profile = negative_profile();
    let engine = SimulationEngine::new(&profile);
    let img = image(24, 16);
    let out = process_image(&img, &engine, &ProcessOptions::default()).unwrap();
    assert_eq!(out.width, 24);
    assert_eq!(out.height, 16);
    assert_eq!(out.data.len(), 24 * 16 * 4);
}

#[test]
fn test_dimension_mismatch_rejected() {
    let profile = negative_profile();
    let engine = SimulationEngine::new(&profile);
    let img = LinearImage {
        width: 10,
        height: 10,
        data: vec![0.0; 17],
    };
    let err = process_image(&img, &engine, &ProcessOptions::default()).unwrap_err();
    assert!(err.contains("does not match"), "unexpected error: {}", err);
}

#[test]
fn test_zero_dimension_rejected() {
    let profile = negative_profile();
    let engine = SimulationEngine::new(&profile);
    let img = LinearImage {
        width: 0,
        height: 4,
        data: vec![],
    };
    assert!(process_image(&img, &engine, &ProcessOptions::default()).is_err());
}

#[test]
fn test_pipeline_is_deterministic() {
    let profile = negative_profile();
    let engine = SimulationEngine::new(&profile);
    let img = image(16, 16);
    let opts = ProcessOptions::default();
    let a = process_image(&img, &engine, &opts).unwrap();
    let b = process_image(&img, &engine, &opts).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn test_brighter_scene_yields_brighter_output() {
    // Preserve exposure so adaptive normalization cannot equalize the two
    // scenes; grain/bloom off for exactness.
    let profile = negative_profile();
    let engine = SimulationEngine::new(&profile);
    let mut opts = quiet_options();
    opts.preserve_exposure = true;

    let dark = anchored_flat(0.02);
    let bright = anchored_flat(0.4);
    let d = process_image(&dark, &engine, &opts).unwrap();
    let b = process_image(&bright, &engine, &opts).unwrap();
    // Compare away from the anchor pixel.
    assert!(
        b.data[20] > d.data[20],
        "bright scene should produce a brighter positive: {} vs {}",
        b.data[20],
        d.data[20]
    );
}

#[test]
fn test_ev_compensation_lightens_output() {
    let profile = negative_profile();
    let engine = SimulationEngine::new(&profile);
    let img = anchored_flat(0.18);
    let mut opts = quiet_options();
    opts.preserve_exposure = true;

    let base = process_image(&img, &engine, &opts).unwrap();
    opts.ev_compensation = 2.0;
    let pushed = process_image(&img, &engine, &opts).unwrap();
    assert!(
        pushed.data[20] > base.data[20],
        "+2 EV must lighten the output: {} vs {}",
        pushed.data[20],
        base.data[20]
    );
}

#[test]
fn test_auto_exposure_reported_in_summary() {
    let profile = negative_profile();
    let engine = SimulationEngine::new(&profile);
    let img = LinearImage {
        width: 8,
        height: 8,
        data: [0.0625, 0.0625, 0.0625, 1.0].repeat(64),
    };
    let mut opts = quiet_options();
    opts.auto_exposure = true;
    let out = process_image(&img, &engine, &opts).unwrap();
    assert!(
        (out.summary.auto_ev_bias - 2.0).abs() < 0.01,
        "two stops under target: {}",
        out.summary.auto_ev_bias
    );
    assert!((out.summary.total_ev - out.summary.auto_ev_bias).abs() < 1e-6);
}

#[test]
fn test_reversal_preserve_exposure_identity_normalization() {
    let profile = reversal_profile();
    let engine = SimulationEngine::new(&profile);
    let mut opts = quiet_options();
    opts.preserve_exposure = true;
    let out = process_image(&image(8, 8), &engine, &opts).unwrap();
    assert_eq!(out.summary.normalization, NormalizationParams::identity());
    assert_eq!(out.summary.film_type, FilmType::Reversal);
}

#[test]
fn test_bw_output_is_gray_with_grain() {
    // B&W skips coupling/halation/saturation but still receives
    // monochrome grain, which shifts all channels identically.
    let profile = bw_profile();
    let engine = SimulationEngine::new(&profile);
    let mut opts = quiet_options();
    opts.grain.strength = 1.0;
    let out = process_image(&image(8, 8), &engine, &opts).unwrap();
    for px in out.data.chunks_exact(4) {
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }
}

#[test]
fn test_saturation_factor_within_bounds() {
    let profile = negative_profile();
    let engine = SimulationEngine::new(&profile);
    let out = process_image(&image(12, 12), &engine, &ProcessOptions::default()).unwrap();
    assert!((1.0..=5.0).contains(&out.summary.saturation_factor));
}

#[test]
fn test_bloom_strength_zero_matches_disabled() {
    // Strength 0 short-circuits, so the two runs must be byte-identical.
    let profile = negative_profile();
    let engine = SimulationEngine::new(&profile);
    let img = image(16, 16);

    let mut opts_a = quiet_options();
    opts_a.bloom.strength = 0.0;
    let mut opts_b = quiet_options();
    opts_b.bloom.strength = -3.0;

    let a = process_image(&img, &engine, &opts_a).unwrap();
    let b = process_image(&img, &engine, &opts_b).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn test_tone_mode_override_changes_rendering() {
    let profile = negative_profile();
    let engine = SimulationEngine::new(&profile);
    let img = image(8, 8);
    let mut opts = quiet_options();
    let aces = process_image(&img, &engine, &opts).unwrap();
    opts.tone_mode = Some(ToneMode::Reinhard);
    let reinhard = process_image(&img, &engine, &opts).unwrap();
    assert_ne!(aces.data, reinhard.data);
}

#[test]
fn test_identity_coupling_matches_no_coupling() {
    let mut with_identity = negative_profile();
    with_identity.dye_coupling = Some(crate::math::IDENTITY_3X3);
    let without = negative_profile();

    let engine_a = SimulationEngine::new(&with_identity);
    let engine_b = SimulationEngine::new(&without);
    let img = image(8, 8);
    let opts = quiet_options();
    let a = process_image(&img, &engine_a, &opts).unwrap();
    let b = process_image(&img, &engine_b, &opts).unwrap();
    assert_eq!(a.data, b.data, "identity coupling must be a true no-op");
}

#[test]
fn test_coupling_matrix_changes_color_output() {
    let mut coupled = negative_profile();
    coupled.dye_coupling = Some([[1.0, 0.15, 0.0], [0.1, 1.0, 0.05], [0.0, 0.1, 1.0]]);
    let plain = negative_profile();

    let engine_a = SimulationEngine::new(&coupled);
    let engine_b = SimulationEngine::new(&plain);
    let img = image(8, 8);
    let opts = quiet_options();
    let a = process_image(&img, &engine_a, &opts).unwrap();
    let b = process_image(&img, &engine_b, &opts).unwrap();
    assert_ne!(a.data, b.data);
}
