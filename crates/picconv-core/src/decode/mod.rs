//! Image decoding and resizing for PicConvert.
//!
//! This module provides functionality for:
//! - Decoding any supported raster format from a file or from bytes
//! - Rejecting oversized inputs from their header before the full decode
//! - Exact and fit-to-box resizing with a Lanczos3 filter
//! - Aspect-ratio locking of requested output dimensions
//!
//! All operations are synchronous and single-threaded.
//!
//! # Examples
//!
//! ```ignore
//! use picconv_core::decode::{decode_file, DEFAULT_MAX_PIXELS};
//!
//! let image = decode_file("photo.png".as_ref(), DEFAULT_MAX_PIXELS).unwrap();
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```

mod load;
mod resize;
mod types;

pub use load::{decode_bytes, decode_file, inspect_dimensions, DEFAULT_MAX_PIXELS};
pub use resize::{
    fit_within, lock_aspect_ratio, preview_thumbnail, resize, resize_to_fit, RESAMPLE_FILTER,
};
pub use types::{DecodeError, PixelMode, SourceImage};
