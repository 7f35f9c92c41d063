//! Light transport along a single camera ray.

use glint_math::Interval;
use rand::RngCore;

use crate::{Color, Hittable, Ray, Scatter};

/// Closest hit distance considered, to avoid self-intersection ("shadow acne").
pub const T_MIN: f32 = 0.001;

/// Radiance for rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Color),
    /// Vertical blend from `bottom` (straight down) to `top` (straight up).
    Gradient { bottom: Color, top: Color },
}

impl Default for Background {
    fn default() -> Self {
        Background::Gradient {
            bottom: Color::ONE,
            top: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Gradient { bottom, top } => {
                let unit_direction = ray.direction().normalize_or_zero();
                let a = 0.5 * (unit_direction.y + 1.0);
                *bottom * (1.0 - a) + *top * a
            }
        }
    }
}

/// Estimate the radiance arriving along `ray`.
///
/// Follows the path for at most `max_depth` surface interactions. Reaching
/// the limit, or a surface that absorbs the ray, contributes black.
pub fn radiance(
    ray: &Ray,
    world: &dyn Hittable,
    background: &Background,
    max_depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut throughput = Color::ONE;
    let mut ray = *ray;
    let mut depth = 0;

    loop {
        let Some(rec) = world.hit(&ray, Interval::new(T_MIN, f32::INFINITY)) else {
            return throughput * background.color(&ray);
        };

        if depth >= max_depth {
            return Color::ZERO;
        }

        match rec.material.scatter(&ray, &rec, rng) {
            Some(Scatter::Emit(emitted)) => return throughput * emitted,
            Some(Scatter::Bounce { attenuation, ray: scattered }) => {
                throughput *= attenuation;
                ray = scattered;
                depth += 1;
            }
            None => return Color::ZERO,
        }
    }
}
