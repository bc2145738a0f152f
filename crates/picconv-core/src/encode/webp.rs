//! Lossy WebP encoding through libwebp.
//!
//! The `image` crate only writes lossless WebP, so quality-controlled
//! output goes through the `webp` crate.

use image::DynamicImage;

use super::EncodeError;

/// Encode an image to lossy WebP at the given quality (0-100).
pub fn encode_webp(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let quality = f32::from(quality.min(100));
    let (width, height) = (image.width(), image.height());

    let encoded = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        ::webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, quality)
    } else {
        let rgb = image.to_rgb8();
        ::webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, quality)
    };

    let memory = encoded.map_err(|e| EncodeError::EncodingFailed(format!("WebP: {e:?}")))?;
    Ok(memory.to_vec())
}
