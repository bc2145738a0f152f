//! Command line arguments.

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::Parser;
use picconv_core::encode::ResolvedQuality;
use picconv_core::{default_output_path, ConversionRequest, TargetFormat, SUPPORTED_EXTENSIONS};

#[derive(Debug, Parser)]
#[command(name = "picconv")]
#[command(about = "Convert images between formats, with an output size estimate")]
#[command(version)]
#[command(after_help = "Examples:\n  \
    picconv photo.jpg -f png -o out.png\n  \
    picconv photo.jpg -f jpg -q 90 -w 1920 --height 1080\n  \
    picconv photo.png -f webp -q 85 --estimate")]
pub struct Cli {
    /// Input image file
    pub input: PathBuf,

    /// Target format
    #[arg(
        short,
        long,
        visible_alias = "to",
        ignore_case = true,
        value_parser = PossibleValuesParser::new(SUPPORTED_EXTENSIONS.iter().copied())
    )]
    pub format: String,

    /// Output file (default: input name with the new extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Quality/compression (JPEG 1-100, WebP 0-100, PNG 0-9)
    #[arg(short, long, allow_negative_numbers = true)]
    pub quality: Option<i32>,

    /// Output width in pixels
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Output height in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Keep the source aspect ratio (width is recomputed from height)
    #[arg(long)]
    pub keep_aspect: bool,

    /// Only print the estimated output size, do not convert
    #[arg(long)]
    pub estimate: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Lowercased extension as typed, e.g. `jpeg` or `tif`.
    pub fn extension(&self) -> String {
        self.format.to_ascii_lowercase()
    }

    pub fn target_format(&self) -> TargetFormat {
        // The value parser only admits supported extensions
        TargetFormat::from_extension(&self.format).unwrap_or(TargetFormat::Jpeg)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input, &self.extension()))
    }

    /// Output dimensions; a missing one keeps the source value.
    pub fn target_dimensions(&self, source: (u32, u32)) -> Option<(u32, u32)> {
        if self.width.is_none() && self.height.is_none() {
            return None;
        }
        Some((
            self.width.unwrap_or(source.0),
            self.height.unwrap_or(source.1),
        ))
    }

    /// Build the pipeline request from validated quality and dimensions.
    pub fn request(&self, quality: &ResolvedQuality, source: (u32, u32)) -> ConversionRequest {
        let mut request = ConversionRequest::new(self.target_format())
            .with_aspect_lock(self.keep_aspect);
        request.quality = quality.value.map(i32::from);
        if let Some((width, height)) = self.target_dimensions(source) {
            request = request.with_size(width, height);
        }
        request
    }
}
