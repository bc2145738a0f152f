//! PicConvert Core - Image conversion pipeline
//!
//! This crate provides the conversion pipeline shared by the PicConvert
//! front ends: decoding, pixel-mode normalization, resizing, format-specific
//! encoding, size estimation and atomic conversion to a destination file.
//!
//! # Module Structure
//!
//! - `format` - The fixed set of target formats and their quality ranges
//! - `decode` - Decoding from files/bytes, resizing, aspect-ratio locking
//! - `normalize` - Flattening transparency for opaque-only formats
//! - `encode` - Encoder parameters and per-format encoders
//! - `pipeline` - `estimate` and `convert` entry points
//! - `info` - File facts, output paths and size formatting for front ends
//! - `worker` - Background conversion for interactive front ends

pub mod decode;
pub mod encode;
pub mod format;
pub mod info;
pub mod normalize;
pub mod pipeline;
pub mod worker;

pub use decode::{decode_file, preview_thumbnail, DecodeError, PixelMode, SourceImage};
pub use encode::{encode_params, EncodeError, EncodeParams, QualityWarning};
pub use format::{QualityRange, TargetFormat, SUPPORTED_EXTENSIONS};
pub use info::{default_output_path, format_megabytes, size_change_percent, ImageInfo};
pub use normalize::normalize;
pub use pipeline::{
    convert, convert_with, estimate, estimate_file, estimate_with, ConversionRequest,
    ConversionResult, ConvertError, ConvertOptions,
};
pub use worker::{spawn_conversion, ConversionJob, DropSupport};
