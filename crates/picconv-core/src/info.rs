//! File facts and size formatting shared by the front ends.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::decode::SourceImage;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// What the front ends show about a loaded source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    pub file_name: String,
    /// Size on disk in bytes.
    pub file_size: u64,
    pub width: u32,
    pub height: u32,
    /// Detected source format, e.g. `PNG`.
    pub format: Option<String>,
}

impl ImageInfo {
    /// Collect file and image facts for a decoded source.
    pub fn inspect(path: &Path, source: &SourceImage) -> std::io::Result<Self> {
        let file_size = std::fs::metadata(path)?.len();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            file_name,
            file_size,
            width: source.width(),
            height: source.height(),
            format: source.source_format_name(),
        })
    }
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File: {}", self.file_name)?;
        writeln!(f, "Size: {}", format_megabytes(self.file_size))?;
        writeln!(f, "Resolution: {}x{} pixels", self.width, self.height)?;
        write!(f, "Format: {}", self.format.as_deref().unwrap_or("unknown"))
    }
}

/// Default output path: same directory, same stem, new extension.
pub fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| "output".into());
    let mut file_name = stem;
    file_name.push(".");
    file_name.push(extension.trim_start_matches('.'));
    input.with_file_name(file_name)
}

fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Render a byte count as megabytes with two decimals, e.g. `1.50 MB`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes_to_mb(bytes))
}

/// Percentage saved relative to the original: `(1 - estimated / original) * 100`.
///
/// Negative when the output is larger. `None` for an empty original.
pub fn size_change_percent(original: u64, estimated: u64) -> Option<f64> {
    if original == 0 {
        return None;
    }
    Some((1.0 - estimated as f64 / original as f64) * 100.0)
}
