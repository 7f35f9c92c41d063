//! The demo room.
//!
//! Walls, floor and ceiling are huge spheres so the room needs no extra
//! primitive types. The floor carries the checker overlay and the ceiling is
//! the only light.

use std::sync::Arc;

use anyhow::Result;
use glint_renderer::{Color, ImageTexture, Material, Scene, Sphere, Texture, Triangle, Vec3};

use crate::{obj, Args, MeshMaterial};

/// Radius of the spheres that make up the room.
const WALL_RADIUS: f32 = 1000.0;

/// Room interior: x in [-4, 4], y in [0, 5], z in [-5, 10].
const HALF_WIDTH: f32 = 4.0;
const HEIGHT: f32 = 5.0;
const BACK: f32 = -5.0;
const FRONT: f32 = 10.0;

fn wall(center: Vec3, material: Material) -> Sphere {
    Sphere::new(center, WALL_RADIUS, material)
}

/// Floor, ceiling light and walls. `open_front` leaves out the wall behind
/// the camera so the background shows through.
pub fn room(open_front: bool) -> Vec<Sphere> {
    let r = WALL_RADIUS;
    let mut spheres = vec![
        wall(Vec3::new(0.0, -r, 0.0), Material::checkered(Color::splat(0.75))),
        wall(Vec3::new(0.0, HEIGHT + r, 0.0), Material::emissive(Color::splat(1.5))),
        wall(
            Vec3::new(-HALF_WIDTH - r, 0.0, 0.0),
            Material::diffuse(Color::new(0.65, 0.08, 0.06)),
        ),
        wall(
            Vec3::new(HALF_WIDTH + r, 0.0, 0.0),
            Material::diffuse(Color::new(0.12, 0.45, 0.15)),
        ),
        wall(Vec3::new(0.0, 0.0, BACK - r), Material::diffuse(Color::splat(0.73))),
    ];
    if !open_front {
        spheres.push(wall(Vec3::new(0.0, 0.0, FRONT + r), Material::diffuse(Color::splat(0.73))));
    }
    spheres
}

/// Glass, glossy and rough metal spheres resting on the floor.
pub fn sphere_trio(center_albedo: Texture) -> Vec<Sphere> {
    vec![
        Sphere::new(Vec3::new(-2.2, 1.0, 0.0), 1.0, Material::dielectric(Color::ONE, 1.5)),
        Sphere::new(Vec3::new(0.0, 1.0, -1.0), 1.0, Material::glossy(center_albedo, 1.5)),
        Sphere::new(
            Vec3::new(2.2, 1.0, 0.0),
            1.0,
            Material::reflective(Color::new(0.8, 0.6, 0.2), 0.15),
        ),
    ]
}

fn mesh_material(kind: MeshMaterial) -> Material {
    match kind {
        MeshMaterial::Glass => Material::dielectric(Color::ONE, 1.45),
        MeshMaterial::Glossy => Material::glossy(Color::new(0.2, 0.35, 0.8), 1.5),
        MeshMaterial::Metal => Material::reflective(Color::splat(0.85), 0.05),
        MeshMaterial::Diffuse => Material::diffuse(Color::splat(0.7)),
    }
}

/// Assemble the scene described by the command line.
pub fn build(args: &Args) -> Result<Scene> {
    let mut spheres = room(args.sky);
    let mut triangles: Vec<Triangle> = Vec::new();

    match &args.mesh {
        Some(path) => {
            let mut mesh = obj::load_obj(path, args.smooth)?;
            obj::fit_to(&mut mesh, Vec3::new(0.0, 0.0, -0.5), 2.5);
            triangles = mesh.into_triangles(&mesh_material(args.material));
        }
        None => {
            let albedo = match &args.texture {
                Some(path) => Texture::Image(Arc::new(ImageTexture::open(path)?)),
                None => Texture::Constant(Color::new(0.9, 0.35, 0.1)),
            };
            spheres.extend(sphere_trio(albedo));
        }
    }

    Ok(Scene::new(spheres, triangles)?)
}
