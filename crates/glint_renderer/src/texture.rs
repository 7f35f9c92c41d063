//! Albedo textures.
//!
//! A texture maps a surface location, given as UV coordinates and the hit
//! point, to a linear colour. Lookups are pure: no caching, no randomness.

use std::path::Path;
use std::sync::Arc;

use glint_math::{Vec2, Vec3};
use thiserror::Error;

use crate::Color;

/// Errors that can occur while building an image texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Texture {0} has no pixels")]
    Empty(String),

    #[error("Expected {expected} pixels for the texture size, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Surface colour source for materials.
#[derive(Clone, Debug)]
pub enum Texture {
    /// The same colour everywhere.
    Constant(Color),
    /// 3-D checkerboard on world-space cells of size `scale`.
    Checker { even: Color, odd: Color, scale: Vec3 },
    /// Checkerboard in UV space with `scale` sized cells.
    UvChecker { even: Color, odd: Color, scale: Vec2 },
    /// Nearest-texel lookup into an image.
    Image(Arc<ImageTexture>),
}

impl Texture {
    /// Colour at the given surface location.
    pub fn color(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Constant(color) => *color,
            Texture::Checker { even, odd, scale } => {
                let cell = (p / *scale).floor();
                if parity(cell.x + cell.y + cell.z) {
                    *even
                } else {
                    *odd
                }
            }
            Texture::UvChecker { even, odd, scale } => {
                let cell = (Vec2::new(u, v) / *scale).floor();
                if parity(cell.x + cell.y) {
                    *even
                } else {
                    *odd
                }
            }
            Texture::Image(image) => image.lookup(u, v),
        }
    }

    /// Whether lookups read the UV coordinates.
    ///
    /// Primitives skip computing UVs for textures that ignore them.
    pub fn needs_uv(&self) -> bool {
        matches!(self, Texture::UvChecker { .. } | Texture::Image(_))
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Constant(color)
    }
}

/// True for even cell sums. `rem_euclid` keeps the pattern regular across zero.
fn parity(cell_sum: f32) -> bool {
    (cell_sum as i64).rem_euclid(2) == 0
}

/// Image data for [`Texture::Image`], linear RGB, top row first.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageTexture {
    /// Build from linear pixels in row-major order, top row first.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> TextureResult<Self> {
        let expected = width as usize * height as usize;
        if expected == 0 {
            return Err(TextureError::Empty("<memory>".to_string()));
        }
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Load an image file, converting sRGB bytes to linear floats.
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(path.display().to_string()));
        }

        let pixels = rgb
            .pixels()
            .map(|p| {
                Color::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);

        Self::from_pixels(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest texel for UV coordinates; `v = 0` is the bottom row.
    ///
    /// Out-of-range coordinates clamp to the border.
    pub fn lookup(&self, u: f32, v: f32) -> Color {
        let nx = self.width as f32;
        let ny = self.height as f32;
        let i = (u * nx).clamp(0.0, nx - 1.0) as u32;
        let j = (v * ny - 0.001).clamp(0.0, ny - 1.0) as u32;

        let row = self.height - 1 - j;
        self.pixels[(row * self.width + i) as usize]
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
