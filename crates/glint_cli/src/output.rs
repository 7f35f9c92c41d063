//! Writing rendered buffers to disk.

use std::path::Path;

use anyhow::{Context, Result};
use glint_renderer::{Color, ImageBuffer};
use image::{Rgb, RgbImage};

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit sRGB-ish bytes: clamp, gamma 2, quantise.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let channel = |c: f32| (255.0 * linear_to_gamma(c.clamp(0.0, 1.0))) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Quantise a buffer into an 8-bit image.
pub fn to_rgb_image(buffer: &ImageBuffer) -> RgbImage {
    RgbImage::from_fn(buffer.width, buffer.height, |x, y| {
        Rgb(color_to_rgb8(buffer.get(x, y)))
    })
}

/// Write `buffer` to `path`; the format follows the file extension.
pub fn save(buffer: &ImageBuffer, path: &Path) -> Result<()> {
    to_rgb_image(buffer)
        .save(path)
        .with_context(|| format!("Failed to write image to {}", path.display()))
}
