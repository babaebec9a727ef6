//! Pass 1: whole-image statistics
//!
//! Runs the full physics transform (minus bloom/grain/tone-map) for every
//! pixel and accumulates the per-channel value collections and per-stage
//! saturation sums that normalization derivation needs. Workers own
//! disjoint row ranges and merge with an associative reduction; the
//! collections are sorted once at the end.

use rayon::prelude::*;

use crate::color::saturation;
use crate::engine::SimulationEngine;
use crate::models::ProcessOptions;

use super::{finalize_pixel, LinearImage, PARALLEL_THRESHOLD};

/// Accumulated pass-1 statistics.
pub(crate) struct PipelineStatistics {
    /// Final per-channel density/transmittance values, sorted ascending.
    pub channels: [Vec<f32>; 3],
    /// Mean HSV-style saturation of the scene input.
    pub input_saturation: f32,
    /// Mean saturation after development (CMY density space).
    pub develop_saturation: f32,
    /// Mean saturation of the scanned transmittance.
    pub scan_saturation: f32,
    /// Mean saturation of the final pass-1 value (post-invert branch).
    pub output_saturation: f32,
}

#[derive(Default)]
struct Accumulator {
    channels: [Vec<f32>; 3],
    sat_input: f64,
    sat_develop: f64,
    sat_scan: f64,
    sat_output: f64,
    count: usize,
}

impl Accumulator {
    fn with_capacity(pixels: usize) -> Self {
        Self {
            channels: [
                Vec::with_capacity(pixels),
                Vec::with_capacity(pixels),
                Vec::with_capacity(pixels),
            ],
            ..Self::default()
        }
    }

    fn push_pixel(
        &mut self,
        engine: &SimulationEngine,
        options: &ProcessOptions,
        rgb: [f32; 3],
        ev: f32,
    ) {
        self.sat_input += f64::from(saturation(rgb[0], rgb[1], rgb[2]));

        let log_exposure = engine.expose(rgb, ev);
        let density = engine.develop(log_exposure);
        self.sat_develop += f64::from(saturation(density[0], density[1], density[2]));

        let scanned = engine.scan(density);
        self.sat_scan += f64::from(saturation(scanned[0], scanned[1], scanned[2]));

        let value = finalize_pixel(engine, options, scanned);
        self.sat_output += f64::from(saturation(value[0], value[1], value[2]));

        for c in 0..3 {
            self.channels[c].push(value[c]);
        }
        self.count += 1;
    }

    fn merge(mut self, other: Self) -> Self {
        for c in 0..3 {
            // Order-independent: a single global sort follows the merge.
            let (mut dst, src) = if self.channels[c].len() >= other.channels[c].len() {
                (std::mem::take(&mut self.channels[c]), &other.channels[c])
            } else {
                (other.channels[c].clone(), &self.channels[c])
            };
            dst.extend_from_slice(src);
            self.channels[c] = dst;
        }
        self.sat_input += other.sat_input;
        self.sat_develop += other.sat_develop;
        self.sat_scan += other.sat_scan;
        self.sat_output += other.sat_output;
        self.count += other.count;
        self
    }

    fn finish(mut self) -> PipelineStatistics {
        for c in 0..3 {
            self.channels[c].sort_unstable_by(f32::total_cmp);
        }
        let n = self.count.max(1) as f64;
        PipelineStatistics {
            channels: self.channels,
            input_saturation: (self.sat_input / n) as f32,
            develop_saturation: (self.sat_develop / n) as f32,
            scan_saturation: (self.sat_scan / n) as f32,
            output_saturation: (self.sat_output / n) as f32,
        }
    }
}

/// Collect pass-1 statistics over the whole image.
pub(crate) fn collect_statistics(
    image: &LinearImage,
    engine: &SimulationEngine,
    options: &ProcessOptions,
    ev: f32,
) -> PipelineStatistics {
    let row_len = image.width as usize * 4;
    let pixels = image.data.len() / 4;

    let acc = if pixels >= PARALLEL_THRESHOLD {
        image
            .data
            .par_chunks(row_len)
            .fold(Accumulator::default, |mut acc, row| {
                for px in row.chunks_exact(4) {
                    acc.push_pixel(engine, options, [px[0], px[1], px[2]], ev);
                }
                acc
            })
            .reduce(Accumulator::default, Accumulator::merge)
    } else {
        let mut acc = Accumulator::with_capacity(pixels);
        for px in image.data.chunks_exact(4) {
            acc.push_pixel(engine, options, [px[0], px[1], px[2]], ev);
        }
        acc
    };

    acc.finish()
}
