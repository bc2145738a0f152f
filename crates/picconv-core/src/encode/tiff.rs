//! LZW-compressed TIFF encoding.
//!
//! The `image` crate's TIFF encoder writes uncompressed strips only, so this
//! goes through the `tiff` crate directly.

use std::io::Cursor;

use image::DynamicImage;
use ::tiff::encoder::{colortype, compression::Lzw, TiffEncoder};

use super::params::TiffCompression;
use super::EncodeError;

/// Encode an image to TIFF with the given compression.
pub fn encode_tiff(
    image: &DynamicImage,
    compression: TiffCompression,
) -> Result<Vec<u8>, EncodeError> {
    let TiffCompression::Lzw = compression;
    let (width, height) = (image.width(), image.height());

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut buffer).map_err(tiff_error)?;

        let written = match image {
            DynamicImage::ImageLuma8(gray) => encoder
                .write_image_with_compression::<colortype::Gray8, _>(
                    width,
                    height,
                    Lzw,
                    gray.as_raw(),
                ),
            DynamicImage::ImageRgb8(rgb) => encoder
                .write_image_with_compression::<colortype::RGB8, _>(
                    width,
                    height,
                    Lzw,
                    rgb.as_raw(),
                ),
            other if other.color().has_alpha() => {
                let rgba = other.to_rgba8();
                encoder.write_image_with_compression::<colortype::RGBA8, _>(
                    width,
                    height,
                    Lzw,
                    rgba.as_raw(),
                )
            }
            other => {
                let rgb = other.to_rgb8();
                encoder.write_image_with_compression::<colortype::RGB8, _>(
                    width,
                    height,
                    Lzw,
                    rgb.as_raw(),
                )
            }
        };
        written.map_err(tiff_error)?;
    }

    Ok(buffer.into_inner())
}

fn tiff_error(err: ::tiff::TiffError) -> EncodeError {
    EncodeError::EncodingFailed(format!("TIFF: {err}"))
}
