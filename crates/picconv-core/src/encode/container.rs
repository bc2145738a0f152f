//! BMP, GIF and ICO output with the encoders' built-in defaults.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use super::EncodeError;
use crate::decode::resize_to_fit;

/// Largest edge an ICO entry can hold.
pub const ICO_MAX_EDGE: u32 = 256;

pub fn encode_bmp(image: &DynamicImage) -> Result<Vec<u8>, EncodeError> {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => write_with(image, ImageFormat::Bmp),
        other => write_with(&DynamicImage::ImageRgb8(other.to_rgb8()), ImageFormat::Bmp),
    }
}

/// GIF output quantizes to a 256-color palette; transparency is kept.
pub fn encode_gif(image: &DynamicImage) -> Result<Vec<u8>, EncodeError> {
    let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
    write_with(&rgba, ImageFormat::Gif)
}

/// Sources larger than 256 px on either edge are scaled down to fit.
pub fn encode_ico(image: &DynamicImage) -> Result<Vec<u8>, EncodeError> {
    let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
    let fitted = resize_to_fit(rgba, ICO_MAX_EDGE);
    if fitted.width() != image.width() || fitted.height() != image.height() {
        log::debug!(
            "ICO entry scaled from {}x{} to {}x{}",
            image.width(),
            image.height(),
            fitted.width(),
            fitted.height()
        );
    }
    write_with(&fitted, ImageFormat::Ico)
}

fn write_with(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(buffer.into_inner())
}
