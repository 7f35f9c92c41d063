//! Glint renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for offline rendering. A [`Scene`] of spheres
//! and triangles is sampled through a thin-lens [`Camera`] by a pool of
//! workers, each accumulating whole-image passes into its own buffer.

mod bvh;
mod camera;
mod error;
mod hittable;
mod integrator;
mod material;
mod mesh;
mod renderer;
pub mod sampling;
mod scene;
mod sphere;
mod texture;
mod triangle;

pub use bvh::{BvhLeaf, BvhNode, BvhStats, DEFAULT_MAX_DEPTH};
pub use camera::{Camera, CameraSettings};
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable};
pub use integrator::{radiance, Background, T_MIN};
pub use material::{Color, Material, Scatter};
pub use mesh::TriangleMesh;
pub use renderer::{plan_jobs, render, ImageBuffer, RenderProgress, RenderSettings};
pub use scene::Scene;
pub use sphere::Sphere;
pub use texture::{ImageTexture, Texture, TextureError, TextureResult};
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Aabb, Interval, Ray, Vec2, Vec3};
