use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box used by the BVH.
///
/// Stored as one interval per axis. `Aabb::EMPTY` is inverted on every axis,
/// so it is the identity for [`Aabb::surrounding`] and never reports a hit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Thickness given to flat boxes (axis-aligned triangles).
    const MIN_EXTENT: f32 = 0.0001;

    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let lo = a.min(b);
        let hi = a.max(b);
        Self::new(
            Interval::new(lo.x, hi.x),
            Interval::new(lo.y, hi.y),
            Interval::new(lo.z, hi.z),
        )
    }

    /// Smallest box containing every point. Empty input gives `Aabb::EMPTY`.
    pub fn enclosing(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::EMPTY;
        };
        let (lo, hi) = points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Self::from_points(lo, hi)
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// True when the box is inverted on some axis (contains nothing).
    pub fn is_empty(&self) -> bool {
        self.x.min > self.x.max || self.y.min > self.y.max || self.z.min > self.z.max
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method. A zero direction component gives an infinite reciprocal;
    /// the resulting infinities (and NaNs from `0 * inf`) are absorbed by the
    /// `max`/`min` reductions, which return the non-NaN operand.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];
            let origin = r.origin[axis];

            let mut t0 = (slab.min - origin) * adinv;
            let mut t1 = (slab.max - origin) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            // Touching a corner or an edge (entry == exit) still counts
            if ray_t.max < ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < Self::MIN_EXTENT {
            self.x = self.x.expand(Self::MIN_EXTENT);
        }
        if self.y.size() < Self::MIN_EXTENT {
            self.y = self.y.expand(Self::MIN_EXTENT);
        }
        if self.z.size() < Self::MIN_EXTENT {
            self.z = self.z.expand(Self::MIN_EXTENT);
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_aabb_from_points_any_order() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 10.0, -5.0));

        assert_eq!(aabb.min(), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(aabb.max(), Vec3::new(10.0, 10.0, 5.0));
    }

    #[test]
    fn test_aabb_flat_box_is_padded() {
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 1.0), Vec3::new(2.0, 2.0, 1.0));
        assert!(aabb.z.size() > 0.0);
        assert!(aabb.z.contains(1.0));
    }

    #[test]
    fn test_aabb_enclosing() {
        let aabb = Aabb::enclosing([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ]);
        assert_eq!(aabb.min(), Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(aabb.max(), Vec3::new(1.0, 3.0, 0.5));

        assert_eq!(Aabb::enclosing(std::iter::empty()), Aabb::EMPTY);
    }

    #[test]
    fn test_aabb_hit_through_center() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(unit_box().hit(&ray, Interval::new(0.0, f32::INFINITY)));

        // Oblique ray aimed at the center from a corner direction
        let ray = Ray::new(Vec3::new(4.0, 3.0, -2.0), Vec3::new(-4.0, -3.0, 2.0));
        assert!(unit_box().hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_miss_diverging() {
        // Outside and pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!unit_box().hit(&ray, Interval::new(0.0, f32::INFINITY)));

        // Outside and moving parallel to the box
        let ray = Ray::new(Vec3::new(3.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!unit_box().hit(&ray, Interval::new(0.0, f32::INFINITY)));

        let ray = Ray::new(Vec3::new(2.0, 2.0, 2.0), Vec3::new(1.0, 0.5, 0.1));
        assert!(!unit_box().hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_hit_respects_interval() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        // Box spans t in [4, 6]
        assert!(!unit_box().hit(&ray, Interval::new(0.0, 3.5)));
        assert!(unit_box().hit(&ray, Interval::new(0.0, 4.5)));
    }

    #[test]
    fn test_aabb_hit_axis_parallel_on_slab_boundary() {
        // Zero direction component with the origin on the x = 1 slab plane:
        // 0 * inf = NaN on that axis, and the z slab still gives t in [4, 6].
        let ray = Ray::new(Vec3::new(1.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(unit_box().hit(&ray, Interval::new(0.0, f32::INFINITY)));
        assert!(!unit_box().hit(&ray, Interval::new(0.0, 3.0)));

        let ray = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::new(0.0, -0.0, 1.0));
        assert!(unit_box().hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_hit_touching_corner() {
        // Enters and leaves the box at the same instant, through (1, 1, 1)
        let ray = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, 1.0, 1.0));
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.hit(&ray, Interval::new(0.001, f32::INFINITY)));

        // Just past the corner it misses
        let ray = Ray::new(Vec3::new(2.1, 0.0, 0.0), Vec3::new(-1.0, 1.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.001, f32::INFINITY)));
    }

    #[test]
    fn test_empty_aabb_never_hit() {
        let rays = [
            Ray::new(Vec3::ZERO, Vec3::X),
            Ray::new(Vec3::ZERO, Vec3::new(-1.0, 0.0, 0.0)),
            Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.3, -0.2, 0.9)),
        ];
        for ray in rays {
            assert!(!Aabb::EMPTY.hit(&ray, Interval::UNIVERSE));
        }
        assert!(Aabb::EMPTY.is_empty());
    }

    #[test]
    fn test_aabb_surrounding_with_empty() {
        let b = unit_box();
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &b), b);
        assert_eq!(b.centroid(), Vec3::ZERO);
    }
}
