//! Pixel-mode normalization ahead of encoding.
//!
//! Formats that only store opaque pixels get alpha-bearing sources flattened
//! onto a white canvas. High-depth sources are reduced to 8-bit truecolor,
//! keeping their alpha channel when they have one. Everything else passes through untouched.

use image::{DynamicImage, Rgb, RgbImage, Rgba};

use crate::decode::PixelMode;
use crate::format::TargetFormat;

/// Background used when flattening transparency.
pub const FLATTEN_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Bring the image into a pixel mode the target format can store.
pub fn normalize(image: DynamicImage, format: TargetFormat) -> DynamicImage {
    let mode = PixelMode::of(&image);

    if format.requires_opaque() && mode.has_alpha() {
        log::debug!("flattening {:?} onto white for {}", mode, format);
        return flatten_onto_white(&image);
    }

    match mode {
        PixelMode::HighDepth { alpha: true } => {
            log::debug!("converting {:?} to 8-bit RGBA for {}", mode, format);
            DynamicImage::ImageRgba8(image.to_rgba8())
        }
        PixelMode::HighDepth { alpha: false } => {
            log::debug!("converting {:?} to 8-bit RGB for {}", mode, format);
            DynamicImage::ImageRgb8(image.to_rgb8())
        }
        _ => image,
    }
}

/// Composite the image over a solid white canvas of the same size.
///
/// The image's own alpha is the blend mask. Without alpha this is a
/// straight copy into RGB.
pub fn flatten_onto_white(image: &DynamicImage) -> DynamicImage {
    if !image.color().has_alpha() {
        return DynamicImage::ImageRgb8(image.to_rgb8());
    }

    let rgba = image.to_rgba8();
    let mut canvas = RgbImage::from_pixel(rgba.width(), rgba.height(), FLATTEN_BACKGROUND);

    for (dst, src) in canvas.pixels_mut().zip(rgba.pixels()) {
        let Rgba([r, g, b, a]) = *src;
        *dst = Rgb([
            blend_over_white(r, a),
            blend_over_white(g, a),
            blend_over_white(b, a),
        ]);
    }

    DynamicImage::ImageRgb8(canvas)
}

#[inline]
fn blend_over_white(channel: u8, alpha: u8) -> u8 {
    let c = u32::from(channel);
    let a = u32::from(alpha);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}
