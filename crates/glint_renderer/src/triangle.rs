//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use glint_math::{Aabb, Interval, Vec3};

/// Below this determinant the ray is treated as parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Unit face normal, zero for degenerate triangles
    normal: Vec3,
    /// Per-vertex normals for smooth shading
    vertex_normals: Option<[Vec3; 3]>,
    material: Material,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new flat-shaded triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

        Self {
            v0,
            v1,
            v2,
            normal,
            vertex_normals: None,
            material,
            bbox: Aabb::enclosing([v0, v1, v2]),
        }
    }

    /// Create a smooth-shaded triangle; the shading normal is interpolated
    /// from the vertex normals at the hit.
    pub fn with_vertex_normals(
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        normals: [Vec3; 3],
        material: Material,
    ) -> Self {
        Self {
            vertex_normals: Some(normals.map(Vec3::normalize_or_zero)),
            ..Self::new(v0, v1, v2, material)
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// True when the three vertices do not span any area.
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }

    /// Shading normal at barycentric `(u, v)`.
    fn shading_normal(&self, u: f32, v: f32) -> Vec3 {
        match self.vertex_normals {
            Some([n0, n1, n2]) => {
                let n = (n0 * (1.0 - u - v) + n1 * u + n2 * v).normalize_or_zero();
                if n == Vec3::ZERO {
                    self.normal
                } else {
                    n
                }
            }
            None => self.normal,
        }
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to the triangle, or the triangle has no area
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.shading_normal(u, v),
            (u, v),
            &self.material,
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grey() -> Material {
        Material::diffuse(Color::splat(0.5))
    }

    fn unit_triangle() -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            grey(),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 1.0).abs() < 0.001);
        assert!((rec.normal - Vec3::Z).length() < 1e-6);
        assert!(rec.front_face);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = unit_triangle();

        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());

        // Ray outside the edges
        let ray = Ray::new(Vec3::new(2.0, 2.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());

        // Ray parallel to the plane
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::X);
        assert!(tri.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_triangle_window_is_exclusive() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert!(tri.hit(&ray, Interval::new(0.001, 1.0)).is_none());
        assert!(tri.hit(&ray, Interval::new(0.001, 1.01)).is_some());
    }

    #[test]
    fn test_degenerate_triangle_never_hit() {
        let p = Vec3::new(0.0, 0.0, -1.0);
        let collinear = Triangle::new(p, p + Vec3::X, p + Vec3::X * 2.0, grey());
        let point = Triangle::new(p, p, p, grey());

        assert!(collinear.is_degenerate());
        assert!(point.is_degenerate());

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.5, 0.0, -1.0));
        assert!(collinear.hit(&ray, Interval::UNIVERSE).is_none());
        assert!(point.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_barycentrics_reconstruct_hit_point() {
        let mut rng = StdRng::seed_from_u64(5);
        let tri = Triangle::new(
            Vec3::new(-1.0, -0.5, -3.0),
            Vec3::new(1.5, -0.8, -2.0),
            Vec3::new(0.2, 1.3, -2.5),
            grey(),
        );
        let [v0, v1, v2] = tri.vertices();
        let mut hits = 0;

        for _ in 0..2000 {
            let target = Vec3::new(rng.gen_range(-1.5..2.0), rng.gen_range(-1.0..1.5), -2.5);
            let origin = Vec3::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5), 1.0);
            let ray = Ray::new(origin, target - origin);

            if let Some(rec) = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)) {
                hits += 1;
                assert!(rec.u >= 0.0 && rec.v >= 0.0 && rec.u + rec.v <= 1.0);

                let barycentric = v0 * (1.0 - rec.u - rec.v) + v1 * rec.u + v2 * rec.v;
                assert!((barycentric - rec.p).length() < 1e-4);
            }
        }
        assert!(hits > 100);
    }

    #[test]
    fn test_smooth_normal_interpolation() {
        let tri = Triangle::with_vertex_normals(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            [Vec3::X, Vec3::Z, Vec3::Y],
            grey(),
        );

        // Aim straight at v0: u = v = 0, so the shading normal is n0
        let ray = Ray::new(Vec3::new(-0.999, -0.999, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.normal - Vec3::X).length() < 0.01);

        // Flat triangle with the same geometry keeps the face normal
        let flat = unit_triangle();
        let rec = flat.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_flat_triangle_bbox_is_padded() {
        let tri = unit_triangle();
        let bbox = tri.bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert!(bbox.min().x <= -1.0 && bbox.max().x >= 1.0);
    }
}
