//! Image encoding pipeline for PicConvert.
//!
//! This module provides functionality for:
//! - Mapping a target format and requested quality to encoder parameters
//! - Encoding to JPEG, PNG, WebP, TIFF, BMP, GIF and ICO
//!
//! Every encoder writes into memory. Callers decide whether the bytes are
//! only measured (estimate) or persisted (convert).
//!
//! # Examples
//!
//! ```ignore
//! use picconv_core::encode::{encode, encode_params};
//! use picconv_core::TargetFormat;
//!
//! let params = encode_params(TargetFormat::Jpeg, Some(90));
//! let jpeg_bytes = encode(&image, &params).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod container;
mod jpeg;
mod params;
mod png;
mod tiff;
mod webp;

use image::DynamicImage;
use thiserror::Error;

pub use container::{encode_bmp, encode_gif, encode_ico, ICO_MAX_EDGE};
pub use jpeg::encode_jpeg;
pub use params::{
    encode_params, resolve_quality, EncodeParams, QualityWarning, ResolvedQuality,
    TiffCompression, DEFAULT_JPEG_QUALITY, DEFAULT_PNG_LEVEL, DEFAULT_WEBP_QUALITY,
};
pub use png::encode_png;
pub use self::tiff::encode_tiff;
pub use self::webp::encode_webp;

/// Errors that can occur during encoding or writing the output.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec rejected the image
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Writing the destination failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode an image with the given parameters.
pub fn encode(image: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    log::debug!("encoding {}x{} with {:?}", width, height, params);

    match *params {
        EncodeParams::Jpeg { quality, optimize } => encode_jpeg(image, quality, optimize),
        EncodeParams::Png { compression_level } => encode_png(image, compression_level),
        EncodeParams::WebP { quality } => encode_webp(image, quality),
        EncodeParams::Tiff { compression } => encode_tiff(image, compression),
        EncodeParams::Bmp => encode_bmp(image),
        EncodeParams::Gif => encode_gif(image),
        EncodeParams::Ico => encode_ico(image),
    }
}
