//! PNG input/output for the reference driver
//!
//! Decodes 8/16-bit PNG into the linear-light RGBA buffer the core
//! consumes, and encodes the core's 8-bit RGBA output back to PNG. This is
//! surrounding-application plumbing; the core itself never touches files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use emulsion_core::{LinearImage, ProcessedImage};

/// Decode a PNG file into a linear-light RGBA buffer.
///
/// Sample values are assumed sRGB-encoded and are linearized; grayscale
/// sources are expanded to RGB, and missing alpha becomes 1.0.
pub fn decode_png<P: AsRef<Path>>(path: P) -> Result<LinearImage, String> {
    let file = File::open(path.as_ref()).map_err(|e| format!("Failed to open PNG file: {}", e))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e| format!("Failed to read PNG info: {}", e))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| "Failed to determine PNG buffer size".to_string())?;
    let mut buf = vec![0u8; buffer_size];
    let frame_info = reader
        .next_frame(&mut buf)
        .map_err(|e| format!("Failed to read PNG frame: {}", e))?;
    let bytes = &buf[..frame_info.buffer_size()];

    let samples: Vec<f32> = match bit_depth {
        png::BitDepth::Eight => bytes.iter().map(|&b| f32::from(b) / 255.0).collect(),
        png::BitDepth::Sixteen => bytes
            .chunks_exact(2)
            .map(|pair| f32::from(u16::from_be_bytes([pair[0], pair[1]])) / 65535.0)
            .collect(),
        other => return Err(format!("Unsupported PNG bit depth: {:?}", other)),
    };

    let channels = match color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => return Err(format!("Unsupported PNG color type: {:?}", other)),
    };

    let pixels = (width * height) as usize;
    if samples.len() < pixels * channels {
        return Err("PNG frame shorter than declared dimensions".to_string());
    }

    let mut data = Vec::with_capacity(pixels * 4);
    for px in samples.chunks_exact(channels) {
        let (r, g, b, a) = match channels {
            1 => (px[0], px[0], px[0], 1.0),
            2 => (px[0], px[0], px[0], px[1]),
            3 => (px[0], px[1], px[2], 1.0),
            _ => (px[0], px[1], px[2], px[3]),
        };
        data.push(srgb_to_linear(r));
        data.push(srgb_to_linear(g));
        data.push(srgb_to_linear(b));
        data.push(a);
    }

    Ok(LinearImage {
        width,
        height,
        data,
    })
}

/// Encode the processed 8-bit RGBA image to a PNG file.
pub fn encode_png<P: AsRef<Path>>(image: &ProcessedImage, path: P) -> Result<(), String> {
    let file =
        File::create(path.as_ref()).map_err(|e| format!("Failed to create PNG file: {}", e))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| format!("Failed to write PNG header: {}", e))?;
    png_writer
        .write_image_data(&image.data)
        .map_err(|e| format!("Failed to write PNG data: {}", e))
}

/// sRGB electro-optical transfer function.
fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
