//! Surface materials and their scattering rules.
//!
//! The set of materials is closed, so each kind is an enum variant with its
//! own scatter routine picked by `match`.

use glint_math::{reflect, refract, schlick, Vec3};
use rand::RngCore;

use crate::sampling::{gen_f32, random_in_hemisphere, random_in_unit_sphere};
use crate::{HitRecord, Ray, Texture};

/// Color type alias (linear RGB, unclamped)
pub type Color = Vec3;

/// Outcome of a successful scatter call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scatter {
    /// The path continues along `ray`, weighted by `attenuation`.
    Bounce { attenuation: Color, ray: Ray },
    /// The path ends at a light source with this colour.
    Emit(Color),
}

/// How light interacts with a surface.
#[derive(Debug, Clone)]
pub enum Material {
    /// Lambertian surface. `checkered` overlays a unit-cell world-space
    /// pattern alternating the albedo and its complement.
    Diffuse { albedo: Texture, checkered: bool },
    /// Mirror, blurred by `roughness`.
    Reflective { albedo: Texture, roughness: f32 },
    /// Glass-like: Fresnel choice between reflection and refraction.
    Dielectric {
        albedo: Texture,
        roughness: f32,
        ior: f32,
        specular: f32,
    },
    /// Plastic-like: Fresnel choice between reflection and a diffuse bounce.
    Glossy {
        albedo: Texture,
        roughness: f32,
        ior: f32,
        specular: f32,
    },
    /// Light source. Never scatters.
    Emissive { emit: Texture },
}

impl Material {
    pub fn diffuse(albedo: impl Into<Texture>) -> Self {
        Material::Diffuse {
            albedo: albedo.into(),
            checkered: false,
        }
    }

    pub fn checkered(albedo: impl Into<Texture>) -> Self {
        Material::Diffuse {
            albedo: albedo.into(),
            checkered: true,
        }
    }

    /// - `roughness`: 0.0 = perfect mirror; larger values blur the reflection
    pub fn reflective(albedo: impl Into<Texture>, roughness: f32) -> Self {
        Material::Reflective {
            albedo: albedo.into(),
            roughness: roughness.max(0.0),
        }
    }

    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn dielectric(albedo: impl Into<Texture>, ior: f32) -> Self {
        Material::Dielectric {
            albedo: albedo.into(),
            roughness: 0.0,
            ior,
            specular: 0.0,
        }
    }

    pub fn glossy(albedo: impl Into<Texture>, ior: f32) -> Self {
        Material::Glossy {
            albedo: albedo.into(),
            roughness: 0.0,
            ior,
            specular: 0.0,
        }
    }

    pub fn emissive(emit: impl Into<Texture>) -> Self {
        Material::Emissive { emit: emit.into() }
    }

    /// Set the perturbation magnitude. Ignored by kinds without one.
    pub fn with_roughness(mut self, value: f32) -> Self {
        match &mut self {
            Material::Reflective { roughness, .. }
            | Material::Dielectric { roughness, .. }
            | Material::Glossy { roughness, .. } => *roughness = value.max(0.0),
            Material::Diffuse { .. } | Material::Emissive { .. } => {}
        }
        self
    }

    /// Set the bias added (halved) to the Fresnel reflect probability.
    /// Ignored by kinds without a Fresnel term.
    pub fn with_specular(mut self, value: f32) -> Self {
        match &mut self {
            Material::Dielectric { specular, .. } | Material::Glossy { specular, .. } => {
                *specular = value
            }
            _ => {}
        }
        self
    }

    /// The texture this material is coloured by.
    pub fn texture(&self) -> &Texture {
        match self {
            Material::Diffuse { albedo, .. }
            | Material::Reflective { albedo, .. }
            | Material::Dielectric { albedo, .. }
            | Material::Glossy { albedo, .. } => albedo,
            Material::Emissive { emit } => emit,
        }
    }

    /// Whether hits on this material need UV coordinates.
    pub fn needs_uv(&self) -> bool {
        self.texture().needs_uv()
    }

    pub fn is_emissive(&self) -> bool {
        matches!(self, Material::Emissive { .. })
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` when the path is absorbed: only a reflective surface
    /// whose perturbed reflection points into the surface does this.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        match self {
            Material::Diffuse { albedo, checkered } => {
                let mut attenuation = albedo.color(rec.u, rec.v, rec.p);
                if *checkered {
                    attenuation = checker_overlay(attenuation, rec.p);
                }
                Some(Scatter::Bounce {
                    attenuation,
                    ray: diffuse_bounce(rec, rng),
                })
            }

            Material::Reflective { albedo, roughness } => {
                let normal = rec.facing_normal();
                let reflected = reflect(ray_in.direction().normalize(), normal);
                let direction = reflected + *roughness * random_in_unit_sphere(rng);

                // Only scatter if the reflected ray leaves the surface
                if direction.dot(normal) > 0.0 {
                    Some(Scatter::Bounce {
                        attenuation: albedo.color(rec.u, rec.v, rec.p),
                        ray: Ray::new(rec.p, direction),
                    })
                } else {
                    None
                }
            }

            Material::Dielectric {
                albedo,
                roughness,
                ior,
                specular,
            } => {
                let fresnel = Fresnel::evaluate(ray_in, rec, *ior, *specular);
                let scatter = match fresnel.refracted {
                    Some(refracted) if gen_f32(rng) >= fresnel.reflect_probability => {
                        let direction = refracted + *roughness * random_in_unit_sphere(rng);
                        Scatter::Bounce {
                            attenuation: albedo.color(rec.u, rec.v, rec.p),
                            ray: Ray::new(rec.p, direction),
                        }
                    }
                    _ => fresnel.reflection(ray_in, rec, *roughness, rng),
                };
                Some(scatter)
            }

            Material::Glossy {
                albedo,
                roughness,
                ior,
                specular,
            } => {
                let fresnel = Fresnel::evaluate(ray_in, rec, *ior, *specular);
                let scatter = if gen_f32(rng) < fresnel.reflect_probability {
                    fresnel.reflection(ray_in, rec, *roughness, rng)
                } else {
                    Scatter::Bounce {
                        attenuation: albedo.color(rec.u, rec.v, rec.p),
                        ray: diffuse_bounce(rec, rng),
                    }
                };
                Some(scatter)
            }

            Material::Emissive { emit } => Some(Scatter::Emit(emit.color(rec.u, rec.v, rec.p))),
        }
    }
}

/// Ray from the hit point towards `normal + hemisphere sample`.
fn diffuse_bounce(rec: &HitRecord, rng: &mut dyn RngCore) -> Ray {
    let normal = rec.facing_normal();
    let direction = normal + random_in_hemisphere(normal, rng);
    Ray::new(rec.p, direction)
}

/// Alternate the albedo with its complement on unit world-space cells.
fn checker_overlay(albedo: Color, p: Vec3) -> Color {
    let cell = p.floor();
    if ((cell.x + cell.y + cell.z) as i64).rem_euclid(2) == 0 {
        albedo
    } else {
        (Color::ONE - albedo).max(Color::ZERO)
    }
}

/// Reflect/refract split at a dielectric boundary.
struct Fresnel {
    reflect_probability: f32,
    /// `None` on total internal reflection
    refracted: Option<Vec3>,
}

impl Fresnel {
    /// Split at the boundary crossed by `ray_in`.
    ///
    /// Schlick is fed the cosine on the optically thinner side. For a ray
    /// leaving the medium that is the transmitted angle, not the scaled
    /// incident form `ior * cos_i`, which exceeds 1 at grazing angles and
    /// drives the estimate below `r0`. With the transmitted angle the reflect
    /// probability rises to 1 at the critical angle.
    fn evaluate(ray_in: &Ray, rec: &HitRecord, ior: f32, specular: f32) -> Self {
        let direction = ray_in.direction();
        let d_dot_n = direction.dot(rec.normal) / direction.length();

        // Exiting the medium when travelling along the outward normal
        let (normal, ni_over_nt) = if d_dot_n > 0.0 {
            (-rec.normal, ior)
        } else {
            (rec.normal, 1.0 / ior)
        };

        let refracted = refract(direction, normal, ni_over_nt);
        let reflect_probability = match refracted {
            Some(_) => {
                // Schlick takes the cosine on the optically thinner side
                let cosine = if d_dot_n > 0.0 {
                    (1.0 - ior * ior * (1.0 - d_dot_n * d_dot_n)).max(0.0).sqrt()
                } else {
                    -d_dot_n
                };
                (schlick(cosine, ior) + 0.5 * specular).clamp(0.0, 1.0)
            }
            None => 1.0,
        };

        Self {
            reflect_probability,
            refracted,
        }
    }

    /// Specular branch, attenuated by the reflect probability as a grey value.
    fn reflection(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        roughness: f32,
        rng: &mut dyn RngCore,
    ) -> Scatter {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        Scatter::Bounce {
            attenuation: Color::splat(self.reflect_probability),
            ray: Ray::new(rec.p, reflected + roughness * random_in_unit_sphere(rng)),
        }
    }
}
