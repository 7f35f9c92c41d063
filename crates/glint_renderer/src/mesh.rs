//! Indexed triangle soups.

use glint_math::Vec3;

use crate::{Material, Triangle};

/// Indexed triangle mesh as produced by a mesh loader.
///
/// `indices` holds three entries per face. When `normals` is present it runs
/// parallel to `positions` and the resulting triangles are smooth shaded.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub normals: Option<Vec<Vec3>>,
}

impl TriangleMesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            normals: None,
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Expand into one triangle per face, all sharing `material`.
    ///
    /// Faces referencing out-of-range vertices are dropped. Degenerate faces
    /// are kept (they never report a hit). Both are reported through `log`.
    pub fn into_triangles(self, material: &Material) -> Vec<Triangle> {
        let normals = self
            .normals
            .as_ref()
            .filter(|n| n.len() == self.positions.len());
        if self.normals.is_some() && normals.is_none() {
            log::warn!(
                "Ignoring vertex normals: {} normals for {} positions",
                self.normals.as_ref().map_or(0, Vec::len),
                self.positions.len()
            );
        }

        let mut triangles = Vec::with_capacity(self.face_count());
        let mut out_of_range = 0usize;
        let mut degenerate = 0usize;

        for face in self.indices.chunks_exact(3) {
            let idx = [face[0] as usize, face[1] as usize, face[2] as usize];
            let (Some(&v0), Some(&v1), Some(&v2)) = (
                self.positions.get(idx[0]),
                self.positions.get(idx[1]),
                self.positions.get(idx[2]),
            ) else {
                out_of_range += 1;
                continue;
            };

            let triangle = match normals {
                Some(n) => Triangle::with_vertex_normals(
                    v0,
                    v1,
                    v2,
                    [n[idx[0]], n[idx[1]], n[idx[2]]],
                    material.clone(),
                ),
                None => Triangle::new(v0, v1, v2, material.clone()),
            };

            if triangle.is_degenerate() {
                degenerate += 1;
            }
            triangles.push(triangle);
        }

        if out_of_range > 0 {
            log::warn!("Dropped {} faces with out-of-range indices", out_of_range);
        }
        if degenerate > 0 {
            log::warn!("Mesh has {} degenerate faces", degenerate);
        }

        triangles
    }
}
