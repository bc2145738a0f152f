//! PNG encoding with an explicit zlib level.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageEncoder};
use std::io::Cursor;

use super::EncodeError;

/// Encode an image to PNG at the given compression level (0-9).
///
/// Level 0 writes stored (uncompressed) deflate blocks.
pub fn encode_png(image: &DynamicImage, compression_level: u8) -> Result<Vec<u8>, EncodeError> {
    let compression = match compression_level.min(9) {
        0 => CompressionType::Uncompressed,
        level => CompressionType::Level(level),
    };

    let mut buffer = Cursor::new(Vec::new());
    let encoder = PngEncoder::new_with_quality(&mut buffer, compression, FilterType::Adaptive);

    encoder
        .write_image(
            image.as_bytes(),
            image.width(),
            image.height(),
            image.color().into(),
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
