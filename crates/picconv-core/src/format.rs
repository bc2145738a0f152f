//! Target formats and their quality ranges.
//!
//! The set of formats is fixed. Each format knows its canonical file
//! extension, whether it can hold transparency, and (for the formats that
//! take one) the valid range of the user-facing quality value.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File extensions accepted as a target format, in display order.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "bmp", "tiff", "tif", "gif", "webp", "ico",
];

/// Returned when an extension or name does not match any target format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported format: {0}")]
pub struct UnknownFormatError(pub String);

/// Output formats the pipeline can encode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Jpeg,
    Png,
    Bmp,
    Tiff,
    Gif,
    WebP,
    Ico,
}

impl TargetFormat {
    /// All formats in the order a format picker lists them.
    pub const ALL: [TargetFormat; 7] = [
        TargetFormat::Jpeg,
        TargetFormat::Png,
        TargetFormat::Bmp,
        TargetFormat::Tiff,
        TargetFormat::Gif,
        TargetFormat::WebP,
        TargetFormat::Ico,
    ];

    /// Look up a format by file extension (case-insensitive, leading dot optional).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(TargetFormat::Jpeg),
            "png" => Some(TargetFormat::Png),
            "bmp" => Some(TargetFormat::Bmp),
            "tiff" | "tif" => Some(TargetFormat::Tiff),
            "gif" => Some(TargetFormat::Gif),
            "webp" => Some(TargetFormat::WebP),
            "ico" => Some(TargetFormat::Ico),
            _ => None,
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical extension used when deriving output file names.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Tiff => "tiff",
            TargetFormat::Gif => "gif",
            TargetFormat::WebP => "webp",
            TargetFormat::Ico => "ico",
        }
    }

    /// Every extension that maps to this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            TargetFormat::Jpeg => &["jpg", "jpeg"],
            TargetFormat::Png => &["png"],
            TargetFormat::Bmp => &["bmp"],
            TargetFormat::Tiff => &["tiff", "tif"],
            TargetFormat::Gif => &["gif"],
            TargetFormat::WebP => &["webp"],
            TargetFormat::Ico => &["ico"],
        }
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "JPEG",
            TargetFormat::Png => "PNG",
            TargetFormat::Bmp => "BMP",
            TargetFormat::Tiff => "TIFF",
            TargetFormat::Gif => "GIF",
            TargetFormat::WebP => "WebP",
            TargetFormat::Ico => "ICO",
        }
    }

    /// Label for a format picker, e.g. `JPEG (.jpg, .jpeg)`.
    pub fn display_name(self) -> String {
        let exts: Vec<String> = self.extensions().iter().map(|e| format!(".{e}")).collect();
        format!("{} ({})", self.name(), exts.join(", "))
    }

    /// Formats that only store fully-opaque pixels.
    ///
    /// Alpha-bearing sources are flattened onto white before encoding to these.
    pub fn requires_opaque(self) -> bool {
        matches!(self, TargetFormat::Jpeg | TargetFormat::Bmp)
    }

    /// Valid quality range, or `None` if the format takes no quality value.
    pub fn quality_range(self) -> Option<QualityRange> {
        match self {
            TargetFormat::Jpeg => Some(QualityRange::new(1, 100, 85, "Quality")),
            TargetFormat::Png => Some(QualityRange::new(0, 9, 6, "Compression")),
            TargetFormat::WebP => Some(QualityRange::new(0, 100, 80, "Quality")),
            TargetFormat::Tiff => Some(QualityRange::new(0, 9, 6, "Compression")),
            TargetFormat::Bmp | TargetFormat::Gif | TargetFormat::Ico => None,
        }
    }

    /// The `image` crate's format tag.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            TargetFormat::Jpeg => image::ImageFormat::Jpeg,
            TargetFormat::Png => image::ImageFormat::Png,
            TargetFormat::Bmp => image::ImageFormat::Bmp,
            TargetFormat::Tiff => image::ImageFormat::Tiff,
            TargetFormat::Gif => image::ImageFormat::Gif,
            TargetFormat::WebP => image::ImageFormat::WebP,
            TargetFormat::Ico => image::ImageFormat::Ico,
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetFormat {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|format| format.name().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| UnknownFormatError(s.to_string()))
    }
}

/// True if the path carries an extension of a supported image format.
pub fn is_supported_image(path: &Path) -> bool {
    TargetFormat::from_path(path).is_some()
}

/// Inclusive range of the user-facing quality value for one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityRange {
    pub min: u8,
    pub max: u8,
    /// Value shown when nothing was requested.
    pub default: u8,
    /// Slider label: "Quality" or "Compression".
    pub label: &'static str,
}

impl QualityRange {
    const fn new(min: u8, max: u8, default: u8, label: &'static str) -> Self {
        Self {
            min,
            max,
            default,
            label,
        }
    }

    /// Check a requested value against the range.
    pub fn contains(&self, value: i32) -> bool {
        (i32::from(self.min)..=i32::from(self.max)).contains(&value)
    }

    /// Return the value as `u8` if it lies in range.
    pub fn accept(&self, value: i32) -> Option<u8> {
        if self.contains(value) {
            u8::try_from(value).ok()
        } else {
            None
        }
    }
}

impl fmt::Display for QualityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_extension_aliases() {
        assert_eq!(TargetFormat::from_extension("jpg"), Some(TargetFormat::Jpeg));
        assert_eq!(TargetFormat::from_extension("JPEG"), Some(TargetFormat::Jpeg));
        assert_eq!(TargetFormat::from_extension(".tif"), Some(TargetFormat::Tiff));
        assert_eq!(TargetFormat::from_extension("webp"), Some(TargetFormat::WebP));
        assert_eq!(TargetFormat::from_extension("psd"), None);
    }

    #[test]
    fn test_every_supported_extension_resolves() {
        for ext in SUPPORTED_EXTENSIONS {
            let format = TargetFormat::from_extension(ext).unwrap();
            assert!(format.extensions().contains(ext));
        }
    }

    #[test]
    fn test_from_path() {
        let path = PathBuf::from("/tmp/photos/Holiday.PNG");
        assert_eq!(TargetFormat::from_path(&path), Some(TargetFormat::Png));
        assert_eq!(TargetFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(TargetFormat::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_from_str_accepts_names() {
        assert_eq!("WebP".parse::<TargetFormat>(), Ok(TargetFormat::WebP));
        assert_eq!("tiff".parse::<TargetFormat>(), Ok(TargetFormat::Tiff));
        assert!("heic".parse::<TargetFormat>().is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(TargetFormat::Jpeg.display_name(), "JPEG (.jpg, .jpeg)");
        assert_eq!(TargetFormat::Ico.display_name(), "ICO (.ico)");
    }

    #[test]
    fn test_requires_opaque() {
        assert!(TargetFormat::Jpeg.requires_opaque());
        assert!(TargetFormat::Bmp.requires_opaque());
        assert!(!TargetFormat::Png.requires_opaque());
        assert!(!TargetFormat::WebP.requires_opaque());
        assert!(!TargetFormat::Gif.requires_opaque());
    }

    #[test]
    fn test_quality_ranges() {
        let jpeg = TargetFormat::Jpeg.quality_range().unwrap();
        assert_eq!((jpeg.min, jpeg.max, jpeg.default), (1, 100, 85));

        let png = TargetFormat::Png.quality_range().unwrap();
        assert_eq!((png.min, png.max, png.default), (0, 9, 6));
        assert_eq!(png.label, "Compression");

        let webp = TargetFormat::WebP.quality_range().unwrap();
        assert_eq!((webp.min, webp.max, webp.default), (0, 100, 80));

        assert!(TargetFormat::Gif.quality_range().is_none());
        assert!(TargetFormat::Bmp.quality_range().is_none());
        assert!(TargetFormat::Ico.quality_range().is_none());
    }

    #[test]
    fn test_quality_range_accept() {
        let jpeg = TargetFormat::Jpeg.quality_range().unwrap();
        assert_eq!(jpeg.accept(1), Some(1));
        assert_eq!(jpeg.accept(100), Some(100));
        assert_eq!(jpeg.accept(0), None);
        assert_eq!(jpeg.accept(150), None);
        assert_eq!(jpeg.accept(-5), None);
        assert_eq!(jpeg.to_string(), "[1-100]");
    }

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("a.gif")));
        assert!(is_supported_image(Path::new("b.TIF")));
        assert!(!is_supported_image(Path::new("c.pdf")));
    }
}
