//! Image resizing for conversion output and preview generation.
//!
//! All resampling goes through the `image` crate's Lanczos3 filter.
//! Functions return new images without modifying the input.

use image::imageops::FilterType;
use image::DynamicImage;

use super::SourceImage;

/// Filter used for every resize in the pipeline.
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Resize an image to exact dimensions.
///
/// Only applies when both `width` and `height` are present and non-zero;
/// otherwise the image is returned unchanged. Aspect ratio is not preserved
/// here, callers lock it beforehand with [`lock_aspect_ratio`].
pub fn resize(image: DynamicImage, width: Option<u32>, height: Option<u32>) -> DynamicImage {
    let (Some(width), Some(height)) = (width, height) else {
        return image;
    };
    if width == 0 || height == 0 {
        return image;
    }

    // Fast path: if dimensions match, nothing to do
    if image.width() == width && image.height() == height {
        return image;
    }

    log::debug!(
        "resizing {}x{} -> {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );
    image.resize_exact(width, height, RESAMPLE_FILTER)
}

/// Recompute the target width so the output keeps the source aspect ratio.
///
/// When both dimensions are given and their ratio differs from the source
/// ratio, height is kept and width becomes
/// `round(height * source_width / source_height)`. Any other combination is
/// returned as given.
pub fn lock_aspect_ratio(
    source: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
) -> (Option<u32>, Option<u32>) {
    let (src_width, src_height) = source;
    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 && src_width > 0 && src_height > 0 => {
            // Compare ratios exactly: w / h == sw / sh  <=>  w * sh == h * sw
            if u64::from(w) * u64::from(src_height) == u64::from(h) * u64::from(src_width) {
                return (Some(w), Some(h));
            }
            let ratio = f64::from(src_width) / f64::from(src_height);
            let locked = (f64::from(h) * ratio).round().max(1.0) as u32;
            (Some(locked), Some(h))
        }
        other => other,
    }
}

/// Resize an image to fit within a maximum edge length while preserving aspect ratio.
///
/// If the image is already within `max_edge`, it is returned unchanged.
pub fn resize_to_fit(image: DynamicImage, max_edge: u32) -> DynamicImage {
    fit_within(image, max_edge, max_edge)
}

/// Resize an image to fit a `max_width x max_height` box, preserving aspect ratio.
///
/// Never upscales.
pub fn fit_within(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (src_width, src_height) = (image.width(), image.height());

    // If already fits, keep as is
    if src_width <= max_width && src_height <= max_height {
        return image;
    }

    let (new_width, new_height) =
        calculate_fit_dimensions(src_width, src_height, max_width, max_height);
    if new_width == 0 || new_height == 0 {
        return image;
    }

    image.resize_exact(new_width, new_height, RESAMPLE_FILTER)
}

/// Generate a preview thumbnail that fits the given box.
///
/// Used by front ends for the preview pane; the source stays untouched.
pub fn preview_thumbnail(source: &SourceImage, max_width: u32, max_height: u32) -> DynamicImage {
    fit_within(source.image().clone(), max_width, max_height)
}

/// Calculate dimensions to fit within a box while preserving aspect ratio.
fn calculate_fit_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if width == 0 || height == 0 || max_width == 0 || max_height == 0 {
        return (0, 0);
    }

    let scale = (f64::from(max_width) / f64::from(width))
        .min(f64::from(max_height) / f64::from(height))
        .min(1.0);

    let new_width = (f64::from(width) * scale).round() as u32;
    let new_height = (f64::from(height) * scale).round() as u32;
    (
        new_width.clamp(1, max_width),
        new_height.clamp(1, max_height),
    )
}
