//! Mapping from (format, requested quality) to encoder parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::{QualityRange, TargetFormat};

/// Default JPEG quality when none (or an invalid one) was requested.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;
/// Default zlib level for PNG.
pub const DEFAULT_PNG_LEVEL: u8 = 6;
/// Default WebP quality.
pub const DEFAULT_WEBP_QUALITY: u8 = 80;

/// Compression scheme for TIFF output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TiffCompression {
    Lzw,
}

/// Encoder settings for one output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodeParams {
    /// Lossy quality in 1..=100. `optimize` builds per-image Huffman tables.
    Jpeg { quality: u8, optimize: bool },
    /// zlib level in 0..=9.
    Png { compression_level: u8 },
    /// Lossy quality in 0..=100.
    WebP { quality: u8 },
    Tiff { compression: TiffCompression },
    Bmp,
    Gif,
    Ico,
}

impl EncodeParams {
    /// The format these parameters encode to.
    pub fn format(&self) -> TargetFormat {
        match self {
            EncodeParams::Jpeg { .. } => TargetFormat::Jpeg,
            EncodeParams::Png { .. } => TargetFormat::Png,
            EncodeParams::WebP { .. } => TargetFormat::WebP,
            EncodeParams::Tiff { .. } => TargetFormat::Tiff,
            EncodeParams::Bmp => TargetFormat::Bmp,
            EncodeParams::Gif => TargetFormat::Gif,
            EncodeParams::Ico => TargetFormat::Ico,
        }
    }
}

/// Build encoder parameters for a format.
///
/// `quality` is the user-facing value, already checked with
/// [`resolve_quality`]. `None` or an out-of-range value selects the format
/// default. For PNG the value is inverted: level = 9 - quality.
pub fn encode_params(format: TargetFormat, quality: Option<u8>) -> EncodeParams {
    let accepted = |q: u8| {
        format
            .quality_range()
            .and_then(|range| range.accept(i32::from(q)))
    };
    let quality = quality.and_then(accepted);

    match format {
        TargetFormat::Jpeg => EncodeParams::Jpeg {
            quality: quality.unwrap_or(DEFAULT_JPEG_QUALITY),
            optimize: true,
        },
        TargetFormat::Png => EncodeParams::Png {
            compression_level: quality.map_or(DEFAULT_PNG_LEVEL, |q| 9 - q),
        },
        TargetFormat::WebP => EncodeParams::WebP {
            quality: quality.unwrap_or(DEFAULT_WEBP_QUALITY),
        },
        // Quality is accepted for TIFF but the scheme never changes
        TargetFormat::Tiff => EncodeParams::Tiff {
            compression: TiffCompression::Lzw,
        },
        TargetFormat::Bmp => EncodeParams::Bmp,
        TargetFormat::Gif => EncodeParams::Gif,
        TargetFormat::Ico => EncodeParams::Ico,
    }
}

/// A requested quality that fell outside the format's range.
///
/// Not a failure: the format default is used instead and the warning is
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Quality {requested} is outside {range} for {format}; using default {}", .range.default)]
pub struct QualityWarning {
    pub format: TargetFormat,
    pub requested: i32,
    pub range: QualityRange,
}

/// Outcome of validating a requested quality.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedQuality {
    /// The value to pass to [`encode_params`]; `None` means format default.
    pub value: Option<u8>,
    pub warning: Option<QualityWarning>,
}

/// Validate a requested quality against the format's range.
pub fn resolve_quality(format: TargetFormat, requested: Option<i32>) -> ResolvedQuality {
    let Some(requested) = requested else {
        return ResolvedQuality::default();
    };

    let Some(range) = format.quality_range() else {
        log::debug!("{format} takes no quality value; ignoring {requested}");
        return ResolvedQuality::default();
    };

    match range.accept(requested) {
        Some(value) => ResolvedQuality {
            value: Some(value),
            warning: None,
        },
        None => ResolvedQuality {
            value: None,
            warning: Some(QualityWarning {
                format,
                requested,
                range,
            }),
        },
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
