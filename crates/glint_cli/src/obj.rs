//! OBJ mesh loading.

use std::path::Path;

use anyhow::{bail, Context, Result};
use glint_renderer::{Aabb, TriangleMesh, Vec3};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    }
}

/// Load every model in an OBJ file into one triangle mesh.
///
/// Vertex normals are kept only when `smooth` is set and every model has them.
pub fn load_obj(path: &Path, smooth: bool) -> Result<TriangleMesh> {
    let (models, _materials) = tobj::load_obj(path, &load_options())
        .with_context(|| format!("Failed to load OBJ {}", path.display()))?;

    let mesh = merge_models(&models, smooth)?;
    log::info!(
        "Loaded {}: {} models, {} vertices, {} faces, normals: {}",
        path.display(),
        models.len(),
        mesh.positions.len(),
        mesh.face_count(),
        mesh.normals.is_some()
    );
    Ok(mesh)
}

fn to_vec3s(flat: &[f32]) -> Vec<Vec3> {
    flat.chunks_exact(3).map(Vec3::from_slice).collect()
}

/// Concatenate models, offsetting indices into the shared vertex list.
fn merge_models(models: &[tobj::Model], smooth: bool) -> Result<TriangleMesh> {
    if models.is_empty() {
        bail!("No models found in OBJ file");
    }

    let with_normals = smooth
        && models
            .iter()
            .all(|m| !m.mesh.normals.is_empty() && m.mesh.normals.len() == m.mesh.positions.len());
    if smooth && !with_normals {
        log::warn!("Smooth shading requested but the mesh lacks vertex normals");
    }

    let mut mesh = TriangleMesh::default();
    let mut normals = Vec::new();

    for model in models {
        let offset = mesh.positions.len() as u32;
        mesh.positions.extend(to_vec3s(&model.mesh.positions));
        mesh.indices.extend(model.mesh.indices.iter().map(|i| i + offset));
        if with_normals {
            normals.extend(to_vec3s(&model.mesh.normals));
        }
    }

    if mesh.indices.is_empty() {
        bail!("OBJ file contains no faces");
    }
    if with_normals {
        mesh.normals = Some(normals);
    }
    Ok(mesh)
}

/// Uniformly scale and move the mesh so its largest extent equals `size`,
/// centred on `base` in x and z and resting on `base.y`.
pub fn fit_to(mesh: &mut TriangleMesh, base: Vec3, size: f32) {
    let bounds = Aabb::enclosing(mesh.positions.iter().copied());
    if bounds.is_empty() {
        return;
    }

    let extent = (bounds.max() - bounds.min()).max_element();
    let scale = if extent > 0.0 { size / extent } else { 1.0 };
    let center = bounds.centroid();
    let anchor = Vec3::new(center.x, bounds.min().y, center.z);

    for p in &mut mesh.positions {
        *p = (*p - anchor) * scale + base;
    }
}
