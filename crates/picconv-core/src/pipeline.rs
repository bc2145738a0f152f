//! The conversion pipeline: normalize, resize, encode, then measure or persist.
//!
//! Both entry points share [`render`]. [`estimate`] keeps the encoded bytes in
//! memory and only reports their length, so nothing is ever written to disk.
//! [`convert`] stages the bytes in a temporary file next to the destination
//! and renames it into place once everything has succeeded.

use std::io::Write;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{self, DecodeError, SourceImage, DEFAULT_MAX_PIXELS};
use crate::encode::{self, encode_params, resolve_quality, EncodeError, EncodeParams, QualityWarning, ResolvedQuality};
use crate::format::TargetFormat;
use crate::normalize::normalize;

/// Errors surfaced at the pipeline boundary.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source path does not exist.
    #[error("Input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The source could not be read or decoded.
    #[error("Could not decode image: {0}")]
    Decode(DecodeError),

    /// The requested output dimensions exceed the pixel limit.
    #[error("Target size {width}x{height} exceeds {limit} pixels")]
    TargetTooLarge { width: u32, height: u32, limit: u64 },

    /// The output could not be encoded or written.
    #[error("Could not write image: {0}")]
    Encode(#[from] EncodeError),
}

impl From<DecodeError> for ConvertError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::NotFound(path) => ConvertError::InputNotFound(path),
            other => ConvertError::Decode(other),
        }
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub format: TargetFormat,
    /// Format-specific quality; validated against the format's range before use.
    pub quality: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Recompute width from height to keep the source aspect ratio.
    #[serde(default)]
    pub keep_aspect_ratio: bool,
}

impl ConversionRequest {
    /// A request that only changes the format.
    pub fn new(format: TargetFormat) -> Self {
        Self {
            format,
            quality: None,
            width: None,
            height: None,
            keep_aspect_ratio: false,
        }
    }

    pub fn with_quality(mut self, quality: i32) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_aspect_lock(mut self, keep: bool) -> Self {
        self.keep_aspect_ratio = keep;
        self
    }

    /// Validate the quality against the target format.
    pub fn resolved_quality(&self) -> ResolvedQuality {
        resolve_quality(self.format, self.quality)
    }

    /// Output dimensions for a source of the given size, after aspect locking.
    ///
    /// `None` means the dimension is not changed.
    pub fn target_dimensions(&self, source: (u32, u32)) -> (Option<u32>, Option<u32>) {
        let width = self.width.filter(|w| *w > 0);
        let height = self.height.filter(|h| *h > 0);
        if self.keep_aspect_ratio {
            decode::lock_aspect_ratio(source, width, height)
        } else {
            (width, height)
        }
    }

    /// The encoder parameters this request resolves to.
    pub fn encode_params(&self) -> EncodeParams {
        encode_params(self.format, self.resolved_quality().value)
    }
}

/// Runtime limits for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Reject sources whose `width * height` exceeds this before decoding,
    /// and requests whose output would exceed it before resizing.
    pub max_decoded_pixels: u64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_decoded_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// Outcome of a conversion, as handed to front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub success: bool,
    /// Human-readable message when `success` is false.
    pub error: Option<String>,
    /// Size of the written (or estimated) output in bytes.
    pub output_size: Option<u64>,
    /// Set when the requested quality was replaced by the default.
    pub warning: Option<QualityWarning>,
}

impl ConversionResult {
    pub fn succeeded(output_size: u64) -> Self {
        Self {
            success: true,
            error: None,
            output_size: Some(output_size),
            warning: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            output_size: None,
            warning: None,
        }
    }

    fn with_warning(mut self, warning: Option<QualityWarning>) -> Self {
        self.warning = warning;
        self
    }
}

impl From<Result<u64, ConvertError>> for ConversionResult {
    fn from(result: Result<u64, ConvertError>) -> Self {
        match result {
            Ok(size) => ConversionResult::succeeded(size),
            Err(err) => ConversionResult::failed(err.to_string()),
        }
    }
}

/// Normalize and resize a copy of the source, and pick encoder parameters.
///
/// Fails without allocating when the output would exceed `max_pixels`.
pub fn prepare(
    source: &SourceImage,
    request: &ConversionRequest,
    max_pixels: u64,
) -> Result<(DynamicImage, EncodeParams), ConvertError> {
    let (width, height) = request.target_dimensions(source.dimensions());
    let (out_w, out_h) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        _ => source.dimensions(),
    };
    if u64::from(out_w) * u64::from(out_h) > max_pixels {
        return Err(ConvertError::TargetTooLarge {
            width: out_w,
            height: out_h,
            limit: max_pixels,
        });
    }

    let resolved = request.resolved_quality();
    if let Some(warning) = &resolved.warning {
        log::warn!("{warning}");
    }
    let params = encode_params(request.format, resolved.value);

    let normalized = normalize(source.image().clone(), request.format);
    let resized = decode::resize(normalized, width, height);

    Ok((resized, params))
}

/// Run normalize, resize and encode, returning the encoded bytes.
pub fn render(
    source: &SourceImage,
    request: &ConversionRequest,
    options: &ConvertOptions,
) -> Result<Vec<u8>, ConvertError> {
    let (image, params) = prepare(source, request, options.max_decoded_pixels)?;
    Ok(encode::encode(&image, &params)?)
}

/// Estimate the output size in bytes without touching the filesystem.
///
/// The encoded output lives only in memory and is dropped before returning.
pub fn estimate(source: &SourceImage, request: &ConversionRequest) -> Result<u64, ConvertError> {
    estimate_with(source, request, &ConvertOptions::default())
}

/// [`estimate`] with explicit limits.
pub fn estimate_with(
    source: &SourceImage,
    request: &ConversionRequest,
    options: &ConvertOptions,
) -> Result<u64, ConvertError> {
    let bytes = render(source, request, options)?;
    log::debug!("estimated {} bytes for {}", bytes.len(), request.format);
    Ok(bytes.len() as u64)
}

/// Decode a file and estimate its converted size.
pub fn estimate_file(
    source_path: &Path,
    request: &ConversionRequest,
    options: &ConvertOptions,
) -> Result<u64, ConvertError> {
    let source = decode::decode_file(source_path, options.max_decoded_pixels)?;
    estimate_with(&source, request, options)
}

/// Convert `source_path` into `dest_path` with default options.
pub fn convert(source_path: &Path, dest_path: &Path, request: &ConversionRequest) -> ConversionResult {
    convert_with(source_path, dest_path, request, &ConvertOptions::default())
}

/// Convert `source_path` into `dest_path`.
///
/// Never returns an error to the caller's control flow; every failure is a
/// `ConversionResult` with `success == false`. The destination is either
/// left untouched or replaced by the complete output.
pub fn convert_with(
    source_path: &Path,
    dest_path: &Path,
    request: &ConversionRequest,
    options: &ConvertOptions,
) -> ConversionResult {
    let warning = request.resolved_quality().warning;
    let result = try_convert(source_path, dest_path, request, options);
    if let Err(err) = &result {
        log::error!("conversion of {} failed: {err}", source_path.display());
    }
    ConversionResult::from(result).with_warning(warning)
}

fn try_convert(
    source_path: &Path,
    dest_path: &Path,
    request: &ConversionRequest,
    options: &ConvertOptions,
) -> Result<u64, ConvertError> {
    if !source_path.exists() {
        return Err(ConvertError::InputNotFound(source_path.to_path_buf()));
    }

    let source = decode::decode_file(source_path, options.max_decoded_pixels)?;
    let bytes = render(&source, request, options)?;
    write_atomically(dest_path, &bytes)?;

    log::info!(
        "wrote {} ({} bytes, {})",
        dest_path.display(),
        bytes.len(),
        request.format
    );
    Ok(bytes.len() as u64)
}

/// Write `bytes` to a temporary file beside `dest` and rename it into place.
///
/// A new file gets the same mode `File::create` would give it; a replaced
/// file keeps its permissions. On any failure the temporary file is removed
/// and `dest` is untouched.
pub fn write_atomically(dest: &Path, bytes: &[u8]) -> Result<(), EncodeError> {
    let dir = dest
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut builder = tempfile::Builder::new();
    builder.prefix(".picconv-").suffix(".part");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same request as File::create; the process umask still applies
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut staged = builder.tempfile_in(dir)?;
    staged.write_all(bytes)?;
    if let Ok(existing) = std::fs::metadata(dest) {
        staged.as_file().set_permissions(existing.permissions())?;
    }
    staged.as_file().sync_all()?;

    staged.persist(dest).map_err(|e| EncodeError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 255) / width) as u8,
                ((y * 255) / height) as u8,
                ((x * y) % 256) as u8,
            ])
        }))
    }

    fn source(image: DynamicImage) -> SourceImage {
        SourceImage::new(image, Some(ImageFormat::Png))
    }

    fn write_png(dir: &Path, name: &str, image: &DynamicImage) -> PathBuf {
        let path = dir.join(name);
        image.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_target_dimensions_with_lock() {
        let request = ConversionRequest::new(TargetFormat::Png)
            .with_size(800, 800)
            .with_aspect_lock(true);
        assert_eq!(request.target_dimensions((1000, 500)), (Some(1600), Some(800)));
    }

    #[test]
    fn test_target_dimensions_without_lock() {
        let request = ConversionRequest::new(TargetFormat::Png).with_size(800, 800);
        assert_eq!(request.target_dimensions((1000, 500)), (Some(800), Some(800)));
    }

    #[test]
    fn test_target_dimensions_zero_treated_as_absent() {
        let request = ConversionRequest::new(TargetFormat::Png).with_size(0, 800);
        assert_eq!(request.target_dimensions((1000, 500)), (None, Some(800)));
    }

    #[test]
    fn test_prepare_applies_lock_and_resize() {
        let src = source(gradient(100, 50));
        let request = ConversionRequest::new(TargetFormat::Jpeg)
            .with_size(80, 80)
            .with_aspect_lock(true);

        let (image, params) = prepare(&src, &request, DEFAULT_MAX_PIXELS).unwrap();
        assert_eq!(image.dimensions(), (160, 80));
        assert_eq!(
            params,
            EncodeParams::Jpeg {
                quality: 85,
                optimize: true
            }
        );
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let src = source(gradient(64, 48));
        for format in TargetFormat::ALL {
            let request = ConversionRequest::new(format);
            let first = estimate(&src, &request).unwrap();
            let second = estimate(&src, &request).unwrap();
            assert_eq!(first, second, "{format}");
            assert!(first > 0);
        }
    }

    #[test]
    fn test_estimate_quality_monotonic() {
        let src = source(gradient(96, 96));

        let jpeg_low = estimate(&src, &ConversionRequest::new(TargetFormat::Jpeg).with_quality(10)).unwrap();
        let jpeg_high = estimate(&src, &ConversionRequest::new(TargetFormat::Jpeg).with_quality(95)).unwrap();
        assert!(jpeg_high >= jpeg_low);

        // PNG: quality 9 means level 0, stored blocks
        let png_low = estimate(&src, &ConversionRequest::new(TargetFormat::Png).with_quality(0)).unwrap();
        let png_high = estimate(&src, &ConversionRequest::new(TargetFormat::Png).with_quality(9)).unwrap();
        assert!(png_high >= png_low);

        let webp_low = estimate(&src, &ConversionRequest::new(TargetFormat::WebP).with_quality(5)).unwrap();
        let webp_high = estimate(&src, &ConversionRequest::new(TargetFormat::WebP).with_quality(100)).unwrap();
        assert!(webp_high >= webp_low);
    }

    #[test]
    fn test_estimate_tiff_invariant_to_quality() {
        let src = source(gradient(50, 40));
        let sizes: Vec<u64> = [0, 3, 9]
            .into_iter()
            .map(|q| estimate(&src, &ConversionRequest::new(TargetFormat::Tiff).with_quality(q)).unwrap())
            .collect();
        assert!(sizes.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_estimate_out_of_range_quality_matches_default() {
        let src = source(gradient(40, 40));
        let clamped = estimate(&src, &ConversionRequest::new(TargetFormat::Jpeg).with_quality(150)).unwrap();
        let default = estimate(&src, &ConversionRequest::new(TargetFormat::Jpeg).with_quality(85)).unwrap();
        assert_eq!(clamped, default);
    }

    #[test]
    fn test_estimate_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &gradient(20, 20));

        let request = ConversionRequest::new(TargetFormat::WebP);
        let size = estimate_file(&input, &request, &ConvertOptions::default()).unwrap();

        assert!(size > 0);
        assert_eq!(dir_entries(dir.path()), vec!["in.png".to_string()]);
    }

    #[test]
    fn test_estimate_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = estimate_file(
            &dir.path().join("nope.png"),
            &ConversionRequest::new(TargetFormat::Jpeg),
            &ConvertOptions::default(),
        );
        assert!(matches!(result, Err(ConvertError::InputNotFound(_))));
    }

    #[test]
    fn test_convert_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &gradient(30, 20));
        let output = dir.path().join("out.jpg");

        let result = convert(&input, &output, &ConversionRequest::new(TargetFormat::Jpeg));

        assert!(result.success, "{:?}", result.error);
        let written = std::fs::metadata(&output).unwrap().len();
        assert_eq!(result.output_size, Some(written));

        let decoded = image::open(&output).unwrap();
        assert_eq!(decoded.dimensions(), (30, 20));
        assert_eq!(dir_entries(dir.path()), vec!["in.png".to_string(), "out.jpg".to_string()]);
    }

    #[test]
    fn test_convert_size_matches_estimate() {
        let dir = tempfile::tempdir().unwrap();
        let img = gradient(64, 64);
        let input = write_png(dir.path(), "in.png", &img);
        let output = dir.path().join("out.webp");
        let request = ConversionRequest::new(TargetFormat::WebP).with_quality(60);

        let estimated = estimate(&source(img), &request).unwrap();
        let result = convert(&input, &output, &request);

        assert_eq!(result.output_size, Some(estimated));
    }

    #[test]
    fn test_roundtrip_jpeg_then_png_preserves_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &gradient(123, 45));
        let jpeg = dir.path().join("mid.jpg");
        let png = dir.path().join("out.png");

        assert!(convert(&input, &jpeg, &ConversionRequest::new(TargetFormat::Jpeg)).success);
        assert!(convert(&jpeg, &png, &ConversionRequest::new(TargetFormat::Png)).success);

        assert_eq!(image::open(&png).unwrap().dimensions(), (123, 45));
    }

    #[test]
    fn test_convert_alpha_to_jpeg_is_white() {
        let dir = tempfile::tempdir().unwrap();
        let transparent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0])));
        let input = write_png(dir.path(), "clear.png", &transparent);
        let output = dir.path().join("clear.jpg");

        assert!(convert(&input, &output, &ConversionRequest::new(TargetFormat::Jpeg).with_quality(100)).success);

        let decoded = image::open(&output).unwrap();
        assert!(!decoded.color().has_alpha());
        for pixel in decoded.to_rgb8().pixels() {
            assert!(pixel.0.iter().all(|c| *c >= 250), "{pixel:?}");
        }
    }

    #[test]
    fn test_convert_alpha_to_bmp_is_opaque() {
        let dir = tempfile::tempdir().unwrap();
        let transparent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([10, 10, 10, 0])));
        let input = write_png(dir.path(), "clear.png", &transparent);
        let output = dir.path().join("clear.bmp");

        assert!(convert(&input, &output, &ConversionRequest::new(TargetFormat::Bmp)).success);

        let decoded = image::open(&output).unwrap();
        assert!(!decoded.color().has_alpha());
        assert!(decoded.to_rgb8().pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_convert_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");

        let result = convert(&dir.path().join("missing.png"), &output, &ConversionRequest::new(TargetFormat::Png));

        assert!(!result.success);
        assert!(result.error.unwrap().contains("does not exist"));
        assert!(!output.exists());
    }

    #[test]
    fn test_convert_undecodable_input_leaves_destination() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.png");
        std::fs::write(&input, b"not an image at all").unwrap();
        let output = dir.path().join("out.png");
        std::fs::write(&output, b"previous contents").unwrap();

        let result = convert(&input, &output, &ConversionRequest::new(TargetFormat::Png));

        assert!(!result.success);
        assert_eq!(std::fs::read(&output).unwrap(), b"previous contents");
        assert_eq!(dir_entries(dir.path()), vec!["broken.png".to_string(), "out.png".to_string()]);
    }

    #[test]
    fn test_convert_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &gradient(8, 8));
        let output = dir.path().join("no_such_dir").join("out.png");

        let result = convert(&input, &output, &ConversionRequest::new(TargetFormat::Png));

        assert!(!result.success);
        assert!(!output.exists());
    }

    #[test]
    fn test_convert_reports_quality_warning() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &gradient(8, 8));
        let output = dir.path().join("out.jpg");

        let result = convert(&input, &output, &ConversionRequest::new(TargetFormat::Jpeg).with_quality(150));

        assert!(result.success);
        let warning = result.warning.unwrap();
        assert_eq!(warning.requested, 150);
        assert_eq!(warning.format, TargetFormat::Jpeg);
    }

    #[test]
    fn test_convert_with_pixel_limit() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &gradient(50, 50));
        let output = dir.path().join("out.png");
        let options = ConvertOptions {
            max_decoded_pixels: 100,
        };

        let result = convert_with(&input, &output, &ConversionRequest::new(TargetFormat::Png), &options);

        assert!(!result.success);
        assert!(result.error.unwrap().contains("too large"));
        assert!(!output.exists());
    }

    #[test]
    fn test_write_atomically_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("file.bin");
        std::fs::write(&dest, b"old").unwrap();

        write_atomically(&dest, b"new contents").unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"new contents");
        assert_eq!(dir_entries(dir.path()), vec!["file.bin".to_string()]);
    }

    #[test]
    fn test_convert_high_depth_alpha_keeps_transparency() {
        let dir = tempfile::tempdir().unwrap();
        let clear = DynamicImage::ImageRgba16(image::ImageBuffer::from_pixel(8, 8, Rgba([0u16, 0, 0, 0])));
        let input = write_png(dir.path(), "deep.png", &clear);

        for (format, name) in [
            (TargetFormat::Png, "deep_out.png"),
            (TargetFormat::WebP, "deep_out.webp"),
            (TargetFormat::Tiff, "deep_out.tiff"),
        ] {
            let output = dir.path().join(name);
            let result = convert(&input, &output, &ConversionRequest::new(format));
            assert!(result.success, "{format}: {:?}", result.error);

            let decoded = image::open(&output).unwrap();
            assert!(decoded.color().has_alpha(), "{format}");
            assert!(decoded.to_rgba8().pixels().all(|p| p.0[3] == 0), "{format}");
        }
    }

    #[test]
    fn test_convert_indexed_gif_to_opaque_formats_is_white() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clear.gif");
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(12, 12, Rgba([0, 0, 0, 0])))
            .save_with_format(&input, ImageFormat::Gif)
            .unwrap();

        let jpeg = dir.path().join("clear.jpg");
        assert!(convert(&input, &jpeg, &ConversionRequest::new(TargetFormat::Jpeg).with_quality(100)).success);
        let decoded = image::open(&jpeg).unwrap();
        assert!(!decoded.color().has_alpha());
        assert!(decoded.to_rgb8().pixels().all(|p| p.0.iter().all(|c| *c >= 250)));

        let bmp = dir.path().join("clear.bmp");
        assert!(convert(&input, &bmp, &ConversionRequest::new(TargetFormat::Bmp)).success);
        let decoded = image::open(&bmp).unwrap();
        assert!(!decoded.color().has_alpha());
        assert!(decoded.to_rgb8().pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_estimate_rejects_oversized_target() {
        let src = source(gradient(10, 10));
        let request = ConversionRequest::new(TargetFormat::Png).with_size(100_000, 100_000);

        let result = estimate(&src, &request);
        assert!(matches!(
            result,
            Err(ConvertError::TargetTooLarge { width: 100_000, height: 100_000, .. })
        ));
    }

    #[test]
    fn test_target_limit_applies_after_aspect_lock() {
        let src = source(gradient(40, 10));
        let options = ConvertOptions {
            max_decoded_pixels: 1_000,
        };
        // 10x20 fits, but locking a 4:1 source widens it to 80x20
        let request = ConversionRequest::new(TargetFormat::Png)
            .with_size(10, 20)
            .with_aspect_lock(true);

        assert!(matches!(
            estimate_with(&src, &request, &options),
            Err(ConvertError::TargetTooLarge { width: 80, height: 20, limit: 1_000 })
        ));
        assert!(estimate_with(&src, &request.clone().with_aspect_lock(false), &options).is_ok());
    }

    #[test]
    fn test_convert_oversized_target_fails_as_value() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", &gradient(8, 8));
        let output = dir.path().join("huge.png");
        let request = ConversionRequest::new(TargetFormat::Png).with_size(100_000, 100_000);

        let result = convert(&input, &output, &request);

        assert!(!result.success);
        assert!(result.error.unwrap().contains("exceeds"));
        assert!(!output.exists());
        assert_eq!(dir_entries(dir.path()), vec!["in.png".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomically_new_file_mode_matches_create() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("plain.bin");
        std::fs::write(&reference, b"x").unwrap();
        let dest = dir.path().join("staged.bin");

        write_atomically(&dest, b"contents").unwrap();

        let mode = |path: &Path| std::fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&dest), mode(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomically_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("shared.bin");
        std::fs::write(&dest, b"old").unwrap();
        std::fs::set_permissions(&dest, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_atomically(&dest, b"new").unwrap();

        let mode = std::fs::metadata(&dest).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }
}
