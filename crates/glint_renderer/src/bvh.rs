//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over triangles. Each level splits its triangles at the
//! median along one axis, cycling x, y, z with depth. The bottom of the tree
//! is a pair of leaves; traversal hands those pairs to the caller, which
//! tests the triangles inside.

use crate::{HitRecord, Hittable, Ray, Triangle};
use glint_math::{Aabb, Interval};

/// Default depth budget for [`BvhNode::new`].
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// A bucket of triangles at the bottom of the tree.
#[derive(Debug, Clone)]
pub struct BvhLeaf {
    bbox: Aabb,
    triangles: Vec<Triangle>,
}

impl BvhLeaf {
    fn new(triangles: Vec<Triangle>) -> Self {
        Self {
            bbox: bounds_of(&triangles),
            triangles,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

/// BVH node - a branch with two children, a pair of leaves, or nothing.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Terminal node holding both halves of the last split.
    Leaves {
        left: BvhLeaf,
        right: BvhLeaf,
        bbox: Aabb,
    },
    /// Tree built from no triangles.
    Empty,
}

/// Shape of a built tree, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhStats {
    pub branches: usize,
    pub leaves: usize,
    pub depth: usize,
    pub triangles: usize,
}

fn bounds_of(triangles: &[Triangle]) -> Aabb {
    triangles
        .iter()
        .fold(Aabb::EMPTY, |acc, tri| Aabb::surrounding(&acc, &tri.bounding_box()))
}

impl BvhNode {
    /// Build a BVH with the default depth budget.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self::with_max_depth(triangles, DEFAULT_MAX_DEPTH)
    }

    /// Build a BVH whose branches nest at most `max_depth` levels.
    pub fn with_max_depth(triangles: Vec<Triangle>, max_depth: usize) -> Self {
        if triangles.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(triangles, max_depth, 0)
    }

    /// Recursive median split. Triangles are ordered by the first vertex on
    /// `axis`; each half is moved into its own subtree.
    fn build(mut triangles: Vec<Triangle>, depth: usize, axis: usize) -> Self {
        let bbox = bounds_of(&triangles);

        triangles.sort_unstable_by(|a, b| a.vertices()[0][axis].total_cmp(&b.vertices()[0][axis]));

        let mid = triangles.len() / 2;
        let right = triangles.split_off(mid);
        let left = triangles;

        if depth == 0 || left.len() <= 1 || right.len() <= 1 {
            return BvhNode::Leaves {
                left: BvhLeaf::new(left),
                right: BvhLeaf::new(right),
                bbox,
            };
        }

        let next_axis = (axis + 1) % 3;
        BvhNode::Branch {
            left: Box::new(Self::build(left, depth - 1, next_axis)),
            right: Box::new(Self::build(right, depth - 1, next_axis)),
            bbox,
        }
    }

    /// Call `visit` with every leaf pair whose node box the ray crosses.
    pub fn for_each_candidate<'a, F>(&'a self, ray: &Ray, ray_t: Interval, visit: &mut F)
    where
        F: FnMut(&'a BvhLeaf, &'a BvhLeaf),
    {
        match self {
            BvhNode::Empty => {}
            BvhNode::Leaves { left, right, bbox } => {
                if bbox.hit(ray, ray_t) {
                    visit(left, right);
                }
            }
            BvhNode::Branch { left, right, bbox } => {
                if bbox.hit(ray, ray_t) {
                    left.for_each_candidate(ray, ray_t, visit);
                    right.for_each_candidate(ray, ray_t, visit);
                }
            }
        }
    }

    /// Collected form of [`BvhNode::for_each_candidate`].
    pub fn candidates(&self, ray: &Ray, ray_t: Interval) -> Vec<(&BvhLeaf, &BvhLeaf)> {
        let mut found = Vec::new();
        self.for_each_candidate(ray, ray_t, &mut |left, right| found.push((left, right)));
        found
    }

    pub fn stats(&self) -> BvhStats {
        match self {
            BvhNode::Empty => BvhStats::default(),
            BvhNode::Leaves { left, right, .. } => BvhStats {
                branches: 0,
                leaves: 2,
                depth: 1,
                triangles: left.triangles.len() + right.triangles.len(),
            },
            BvhNode::Branch { left, right, .. } => {
                let l = left.stats();
                let r = right.stats();
                BvhStats {
                    branches: l.branches + r.branches + 1,
                    leaves: l.leaves + r.leaves,
                    depth: l.depth.max(r.depth) + 1,
                    triangles: l.triangles + r.triangles,
                }
            }
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        self.for_each_candidate(ray, ray_t, &mut |left, right| {
            for tri in left.triangles.iter().chain(&right.triangles) {
                let window = ray_t.with_max(closest.map_or(ray_t.max, |rec| rec.t));
                if let Some(rec) = tri.hit(ray, window) {
                    closest = Some(rec);
                }
            }
        });

        closest
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaves { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Material};
    use glint_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grey() -> Material {
        Material::diffuse(Color::splat(0.5))
    }

    fn random_soup(rng: &mut StdRng, count: usize) -> Vec<Triangle> {
        (0..count)
            .map(|_| {
                let base = Vec3::new(
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-15.0..-5.0),
                );
                let mut corner = || {
                    base + Vec3::new(
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                    )
                };
                let (a, b, c) = (corner(), corner(), corner());
                Triangle::new(a, b, c, grey())
            })
            .collect()
    }

    fn quad_at(x: f32) -> Triangle {
        Triangle::new(
            Vec3::new(x - 0.4, -0.4, -5.0),
            Vec3::new(x + 0.4, -0.4, -5.0),
            Vec3::new(x, 0.4, -5.0),
            grey(),
        )
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert!(bvh.bounding_box().is_empty());

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(bvh.hit(&ray, Interval::UNIVERSE).is_none());
        assert!(bvh.candidates(&ray, Interval::UNIVERSE).is_empty());
    }

    #[test]
    fn test_bvh_single_triangle() {
        let bvh = BvhNode::new(vec![quad_at(0.0)]);

        // One triangle ends up in a leaf pair with an empty partner
        assert!(matches!(bvh, BvhNode::Leaves { .. }));
        assert_eq!(bvh.stats().triangles, 1);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_row_of_triangles() {
        let triangles: Vec<Triangle> = (0..10).map(|i| quad_at(i as f32)).collect();
        let bvh = BvhNode::new(triangles);

        let stats = bvh.stats();
        assert_eq!(stats.triangles, 10);
        assert!(stats.branches > 0);

        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.p.z - (-5.0)).abs() < 0.01);

        // Only the pairs on the ray's path are visited
        let visited: usize = bvh
            .candidates(&ray, Interval::new(0.001, f32::INFINITY))
            .iter()
            .map(|(l, r)| l.triangles().len() + r.triangles().len())
            .sum();
        assert!(visited < 10);
    }

    #[test]
    fn test_bvh_prunes_missing_rays() {
        let triangles: Vec<Triangle> = (0..10).map(|i| quad_at(i as f32)).collect();
        let bvh = BvhNode::new(triangles);

        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(bvh.candidates(&ray, Interval::new(0.001, f32::INFINITY)).is_empty());
    }

    #[test]
    fn test_zero_depth_budget_gives_single_pair() {
        let mut rng = StdRng::seed_from_u64(1);
        let bvh = BvhNode::with_max_depth(random_soup(&mut rng, 9), 0);

        match &bvh {
            BvhNode::Leaves { left, right, .. } => {
                assert_eq!(left.triangles().len(), 4);
                assert_eq!(right.triangles().len(), 5);
            }
            other => panic!("expected a leaf pair, got {:?}", other.stats()),
        }
    }

    #[test]
    fn test_node_bounds_cover_children() {
        let mut rng = StdRng::seed_from_u64(2);
        let bvh = BvhNode::new(random_soup(&mut rng, 64));

        fn check(node: &BvhNode) {
            let outer = node.bounding_box();
            let inner = match node {
                BvhNode::Empty => return,
                BvhNode::Leaves { left, right, .. } => {
                    Aabb::surrounding(&left.bounding_box(), &right.bounding_box())
                }
                BvhNode::Branch { left, right, .. } => {
                    check(left);
                    check(right);
                    Aabb::surrounding(&left.bounding_box(), &right.bounding_box())
                }
            };
            assert_eq!(outer, inner);
        }
        check(&bvh);
    }

    #[test]
    fn test_bvh_keeps_hit_on_box_corner() {
        // The ray only touches the unit cube at (1, 1, 1), which is also a
        // vertex of the first triangle
        let corner = Triangle::new(
            Vec3::ONE,
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            grey(),
        );
        let inside: Vec<Triangle> = (0..6)
            .map(|i| {
                let o = i as f32 * 0.1;
                Triangle::new(
                    Vec3::new(o, o, o),
                    Vec3::new(o + 0.3, o, o),
                    Vec3::new(o, o + 0.3, o + 0.2),
                    grey(),
                )
            })
            .collect();

        let ray = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, 1.0, 1.0));
        let window = Interval::new(0.001, f32::INFINITY);
        let expected = corner.hit(&ray, window).map(|rec| rec.t);
        assert_eq!(expected, Some(1.0));

        let single = BvhNode::new(vec![corner.clone()]);
        assert_eq!(single.hit(&ray, window).map(|rec| rec.t), expected);

        let mut triangles = inside;
        triangles.push(corner);
        let bvh = BvhNode::new(triangles);
        assert!(bvh.stats().branches > 0);
        assert_eq!(bvh.hit(&ray, window).map(|rec| rec.t), expected);
    }

    #[test]
    fn test_bvh_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(99);
        let triangles = random_soup(&mut rng, 300);
        let bvh = BvhNode::new(triangles.clone());
        let window = Interval::new(0.001, f32::INFINITY);

        let mut hits = 0;
        for _ in 0..500 {
            let origin = Vec3::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0), 0.0);
            let target = Vec3::new(rng.gen_range(-6.0..6.0), rng.gen_range(-6.0..6.0), -10.0);
            let ray = Ray::new(origin, target - origin);

            let brute = triangles
                .iter()
                .filter_map(|tri| tri.hit(&ray, window))
                .map(|rec| rec.t)
                .min_by(f32::total_cmp);
            let accelerated = bvh.hit(&ray, window).map(|rec| rec.t);

            assert_eq!(brute, accelerated);
            hits += brute.is_some() as usize;
        }
        assert!(hits > 50);
    }
}
