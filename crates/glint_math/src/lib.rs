// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod aabb;
mod interval;
mod optics;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use optics::{reflect, refract, schlick};
pub use ray::Ray;
