//! The renderable world: spheres plus a BVH over triangles.

use glint_math::{Aabb, Interval};

use crate::{BvhNode, HitRecord, Hittable, Ray, RenderError, Sphere, Triangle};

/// Read-only collection of primitives shared by every render worker.
#[derive(Debug, Clone)]
pub struct Scene {
    spheres: Vec<Sphere>,
    bvh: BvhNode,
    triangle_count: usize,
}

impl Scene {
    /// Build the scene, constructing the BVH over `triangles`.
    ///
    /// A scene with no primitives at all is rejected.
    pub fn new(spheres: Vec<Sphere>, triangles: Vec<Triangle>) -> Result<Self, RenderError> {
        if spheres.is_empty() && triangles.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        let triangle_count = triangles.len();
        let start = std::time::Instant::now();
        let bvh = BvhNode::new(triangles);

        if triangle_count > 0 {
            let stats = bvh.stats();
            log::info!(
                "BVH built in {:.2?}: {} triangles, {} branches, {} leaves, depth {}",
                start.elapsed(),
                stats.triangles,
                stats.branches,
                stats.leaves,
                stats.depth
            );
        }
        let scene = Self {
            spheres,
            bvh,
            triangle_count,
        };
        let bounds = scene.bounding_box();
        log::info!(
            "Scene: {} spheres, {} triangles, bounds {} to {}",
            scene.spheres.len(),
            triangle_count,
            bounds.min(),
            bounds.max()
        );

        Ok(scene)
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn bvh(&self) -> &BvhNode {
        &self.bvh
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }
}

impl Hittable for Scene {
    /// Closest hit among all spheres and the triangles the BVH offers.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for sphere in &self.spheres {
            let window = ray_t.with_max(closest.map_or(ray_t.max, |rec| rec.t));
            if let Some(rec) = sphere.hit(ray, window) {
                closest = Some(rec);
            }
        }

        let window = ray_t.with_max(closest.map_or(ray_t.max, |rec| rec.t));
        self.bvh.hit(ray, window).or(closest)
    }

    fn bounding_box(&self) -> Aabb {
        self.spheres
            .iter()
            .fold(self.bvh.bounding_box(), |acc, s| Aabb::surrounding(&acc, &s.bounding_box()))
    }
}
