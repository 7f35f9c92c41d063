//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Material, Ray};
use glint_math::{Aabb, Interval, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Outward unit surface normal (not flipped towards the ray)
    pub normal: Vec3,
    /// Texture coordinates; barycentric for triangles
    pub u: f32,
    pub v: f32,
    /// Whether the ray arrived from the side the normal points to
    pub front_face: bool,
    /// Material at the intersection point
    pub material: &'a Material,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t` on `ray`.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a Material,
    ) -> Self {
        Self {
            t,
            p: ray.at(t),
            normal: outward_normal,
            u,
            v,
            front_face: ray.direction().dot(outward_normal) < 0.0,
            material,
        }
    }

    /// The normal turned to face against the incoming ray.
    pub fn facing_normal(&self) -> Vec3 {
        if self.front_face {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `t` strictly inside `ray_t`, if any.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_front_face_and_facing_normal() {
        let material = Material::diffuse(Color::ONE);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = HitRecord::new(&ray, 4.0, Vec3::Z, (0.0, 0.0), &material);
        assert!(rec.front_face);
        assert_eq!(rec.facing_normal(), Vec3::Z);
        assert_eq!(rec.p, Vec3::new(0.0, 0.0, 1.0));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, (0.0, 0.0), &material);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert_eq!(rec.facing_normal(), -Vec3::Z);
    }
}
