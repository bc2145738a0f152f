//! Decoding source images from files and bytes.

use std::io::Cursor;
use std::path::Path;

use image::ImageReader;

use super::{DecodeError, SourceImage};

/// Default upper bound on `width * height` accepted before decoding.
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000;

/// Decode an image file, detecting its format from the content.
///
/// # Errors
///
/// Returns `DecodeError::NotFound` if the path does not exist,
/// `DecodeError::UnknownFormat` if the content is not a recognized image,
/// `DecodeError::TooLarge` if the header exceeds `max_pixels`, and
/// `DecodeError::Corrupted` if decoding fails part way.
pub fn decode_file(path: &Path, max_pixels: u64) -> Result<SourceImage, DecodeError> {
    if !path.exists() {
        return Err(DecodeError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    decode_bytes(&bytes, max_pixels)
}

/// Decode an in-memory image, detecting its format from the content.
///
/// The header dimensions are checked against `max_pixels` before the full
/// decode so oversized inputs are rejected without allocating the buffer.
pub fn decode_bytes(bytes: &[u8], max_pixels: u64) -> Result<SourceImage, DecodeError> {
    let (width, height) = inspect_dimensions(bytes)?;
    let pixels = u64::from(width) * u64::from(height);
    if pixels > max_pixels {
        return Err(DecodeError::TooLarge {
            width,
            height,
            limit: max_pixels,
        });
    }

    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format();

    let image = reader
        .decode()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))?;

    log::debug!(
        "decoded {:?} image {}x{} ({:?})",
        format,
        image.width(),
        image.height(),
        image.color()
    );

    Ok(SourceImage::new(image, format))
}

/// Read width and height from the header only.
pub fn inspect_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if reader.format().is_none() {
        return Err(DecodeError::UnknownFormat);
    }

    reader
        .into_dimensions()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_bytes_png() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(12, 8));
        let source = decode_bytes(&png_bytes(&image), DEFAULT_MAX_PIXELS).unwrap();

        assert_eq!(source.dimensions(), (12, 8));
        assert_eq!(source.source_format(), Some(ImageFormat::Png));
        assert!(source.mode().has_alpha());
    }

    #[test]
    fn test_decode_garbage_is_unknown_format() {
        let result = decode_bytes(b"definitely not an image", DEFAULT_MAX_PIXELS);
        assert!(matches!(result, Err(DecodeError::UnknownFormat)));
    }

    #[test]
    fn test_decode_truncated_is_corrupted() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, image::Rgb([9, 80, 200])));
        let bytes = png_bytes(&image);
        let truncated = &bytes[..bytes.len() / 2];

        let result = decode_bytes(truncated, DEFAULT_MAX_PIXELS);
        assert!(matches!(result, Err(DecodeError::Corrupted(_))));
    }

    #[test]
    fn test_pixel_limit_rejects_before_decode() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(40, 30));
        let result = decode_bytes(&png_bytes(&image), 1000);

        assert!(matches!(
            result,
            Err(DecodeError::TooLarge {
                width: 40,
                height: 30,
                limit: 1000
            })
        ));
    }

    #[test]
    fn test_decode_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");

        let result = decode_file(&path, DEFAULT_MAX_PIXELS);
        assert!(matches!(result, Err(DecodeError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_decode_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.bmp");
        DynamicImage::ImageRgb8(RgbImage::new(7, 5)).save(&path).unwrap();

        let source = decode_file(&path, DEFAULT_MAX_PIXELS).unwrap();
        assert_eq!(source.dimensions(), (7, 5));
        assert_eq!(source.source_format(), Some(ImageFormat::Bmp));
    }

    #[test]
    fn test_inspect_dimensions() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(320, 240));
        assert_eq!(inspect_dimensions(&png_bytes(&image)).unwrap(), (320, 240));
    }
}
