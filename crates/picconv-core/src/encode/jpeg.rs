//! Baseline JPEG encoding.
//!
//! Written with `jpeg-encoder`, which can build per-image Huffman tables.
//! Grayscale images stay single-channel; everything else is written as RGB.

use image::DynamicImage;
use jpeg_encoder::{ColorType, Encoder};

use super::EncodeError;

/// Largest edge a baseline JPEG frame header can describe.
pub const JPEG_MAX_EDGE: u32 = u16::MAX as u32;

/// Encode an image to JPEG bytes.
///
/// `image` must already be opaque. `quality` is clamped to 1-100.
/// With `optimize` set, Huffman tables are computed from the image instead
/// of using the standard tables, which never makes the output larger.
pub fn encode_jpeg(image: &DynamicImage, quality: u8, optimize: bool) -> Result<Vec<u8>, EncodeError> {
    let quality = quality.clamp(1, 100);
    let (width, height) = jpeg_dimensions(image)?;

    let mut buffer = Vec::new();
    let mut encoder = Encoder::new(&mut buffer, quality);
    encoder.set_optimized_huffman_tables(optimize);

    let result = match image {
        DynamicImage::ImageLuma8(gray) => encoder.encode(gray.as_raw(), width, height, ColorType::Luma),
        DynamicImage::ImageRgb8(rgb) => encoder.encode(rgb.as_raw(), width, height, ColorType::Rgb),
        other => {
            let rgb = other.to_rgb8();
            encoder.encode(rgb.as_raw(), width, height, ColorType::Rgb)
        }
    };
    result.map_err(|e| EncodeError::EncodingFailed(format!("JPEG: {e}")))?;

    Ok(buffer)
}

fn jpeg_dimensions(image: &DynamicImage) -> Result<(u16, u16), EncodeError> {
    match (u16::try_from(image.width()), u16::try_from(image.height())) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(EncodeError::EncodingFailed(format!(
            "JPEG: {}x{} exceeds the {JPEG_MAX_EDGE} pixel edge limit",
            image.width(),
            image.height()
        ))),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
