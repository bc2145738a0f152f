//! Core types for image decoding.

use std::path::PathBuf;

use image::{ColorType, DynamicImage, ImageFormat};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The source path does not exist.
    #[error("File does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes do not match any known image format.
    #[error("Invalid or unsupported image format")]
    UnknownFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    Corrupted(String),

    /// Header dimensions exceed the configured pixel limit.
    #[error("Image too large: {width}x{height} exceeds {limit} pixels")]
    TooLarge { width: u32, height: u32, limit: u64 },
}

/// Pixel layout of a decoded image, as far as format compatibility cares.
///
/// Palette images are expanded by the decoder, so an indexed source shows up
/// here as `Rgb` or `Rgba` depending on whether its palette is transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMode {
    /// 8-bit luminance.
    Gray,
    /// 8-bit luminance with alpha.
    GrayAlpha,
    /// 8-bit truecolor.
    Rgb,
    /// 8-bit truecolor with alpha.
    Rgba,
    /// 16-bit or floating point samples.
    HighDepth { alpha: bool },
}

impl PixelMode {
    /// Classify a decoded image.
    pub fn of(image: &DynamicImage) -> Self {
        match image.color() {
            ColorType::L8 => PixelMode::Gray,
            ColorType::La8 => PixelMode::GrayAlpha,
            ColorType::Rgb8 => PixelMode::Rgb,
            ColorType::Rgba8 => PixelMode::Rgba,
            other => PixelMode::HighDepth {
                alpha: other.has_alpha(),
            },
        }
    }

    /// True if the mode carries an alpha channel.
    pub fn has_alpha(self) -> bool {
        match self {
            PixelMode::GrayAlpha | PixelMode::Rgba => true,
            PixelMode::HighDepth { alpha } => alpha,
            PixelMode::Gray | PixelMode::Rgb => false,
        }
    }
}

/// A decoded source image.
///
/// Holds the pixel buffer together with the format the decoder detected.
/// There are no mutators; the pipeline works on copies.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    source_format: Option<ImageFormat>,
}

impl SourceImage {
    /// Wrap an already decoded image.
    pub fn new(image: DynamicImage, source_format: Option<ImageFormat>) -> Self {
        Self {
            image,
            source_format,
        }
    }

    /// Borrow the pixel buffer.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    pub fn mode(&self) -> PixelMode {
        PixelMode::of(&self.image)
    }

    /// The format detected while decoding, if the image came from bytes.
    pub fn source_format(&self) -> Option<ImageFormat> {
        self.source_format
    }

    /// Human-readable name of the detected source format.
    pub fn source_format_name(&self) -> Option<String> {
        self.source_format.map(|format| format!("{format:?}").to_uppercase())
    }
}
