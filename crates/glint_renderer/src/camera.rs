//! Thin-lens camera for ray generation.

use crate::sampling::random_in_unit_disk;
use crate::Ray;
use glint_math::Vec3;
use rand::RngCore;

/// Camera placement and lens parameters.
///
/// Build with the `with_*` setters, then call [`CameraSettings::build`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Viewport width over height
    pub aspect: f32,
    /// Lens diameter; zero gives a pinhole camera
    pub aperture: f32,
    /// Distance from the lens to the plane of perfect focus
    pub focus_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            vfov: 90.0,
            aspect: 1.0,
            aperture: 0.0,
            focus_distance: 1.0,
        }
    }
}

impl CameraSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, up: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.up = up;
        self
    }

    /// Set vertical field of view in degrees.
    pub fn with_vfov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Set aspect ratio from an image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.aspect = width as f32 / height.max(1) as f32;
        self
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, aperture: f32, focus_distance: f32) -> Self {
        self.aperture = aperture;
        self.focus_distance = focus_distance;
        self
    }

    /// Focus on the look-at point.
    pub fn focus_on_target(mut self) -> Self {
        self.focus_distance = (self.look_from - self.look_at).length();
        self
    }

    /// Derive the camera frame.
    pub fn build(&self) -> Camera {
        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect * half_height;

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize_or_zero();
        let u = self.up.cross(w).normalize_or_zero();
        let v = w.cross(u);

        let origin = self.look_from;
        let focus = self.focus_distance;
        let lower_left = origin - half_width * focus * u - half_height * focus * v - focus * w;

        Camera {
            origin,
            lower_left,
            horizontal: 2.0 * half_width * focus * u,
            vertical: 2.0 * half_height * focus * v,
            u,
            v,
            w,
            lens_radius: self.aperture / 2.0,
        }
    }
}

/// Camera for generating rays into the scene. Immutable once built.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Generate a ray through viewport coordinates `(s, t)`, both in [0, 1]
    /// with `t = 0` at the bottom edge.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let target = self.lower_left + s * self.horizontal + t * self.vertical;
        Ray::new(self.origin + offset, target - self.origin - offset)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit vector pointing backwards from the view direction.
    pub fn w(&self) -> Vec3 {
        self.w
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}
