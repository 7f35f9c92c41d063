//! Reflection and refraction formulas shared by the scattering code.

use crate::Vec3;

/// Reflect `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract `v` through a surface with unit normal `n` facing against `v`.
///
/// `ni_over_nt` is the ratio of refractive indices (incident over transmitted).
/// Returns `None` on total internal reflection.
#[inline]
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation of Fresnel reflectance.
#[inline]
pub fn schlick(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_mirrors_normal_component() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let r = reflect(v, Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_straight_through() {
        // Normal incidence is not bent, whatever the ratio.
        let t = refract(Vec3::new(0.0, -2.0, 0.0), Vec3::Y, 1.0 / 1.5).unwrap();
        assert!((t - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_refract_obeys_snell() {
        let ratio = 1.0 / 1.5;
        let v = Vec3::new(1.0, -1.0, 0.0).normalize();
        let t = refract(v, Vec3::Y, ratio).unwrap().normalize();

        let sin_in = v.x.abs();
        let sin_out = t.x.abs();
        assert!((sin_out - ratio * sin_in).abs() < 1e-5);
        assert!(t.y < 0.0);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Leaving glass at a grazing angle.
        let v = Vec3::new(1.0, -0.1, 0.0);
        assert!(refract(v, Vec3::Y, 1.5).is_none());
    }

    #[test]
    fn test_schlick_limits() {
        let r0 = ((1.0f32 - 1.5) / (1.0 + 1.5)).powi(2);
        assert!((schlick(1.0, 1.5) - r0).abs() < 1e-6);
        assert!((schlick(0.0, 1.5) - 1.0).abs() < 1e-6);
    }
}
