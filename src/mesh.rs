use bevy::prelude::*;

use crate::{
    error::{MarchingCubesError, Result},
    types::Vector,
};

/// Triangle mesh produced by one triangulation pass.
///
/// Vertices are stored flat — every group of three consecutive vertices
/// forms one triangle, and `indices` is simply `0..vertices.len()`.
/// Vertices are deliberately not welded across cells, so normals are flat
/// per-face normals; smooth shading would need a separate welding pass.
///
/// Inserted on a [`Volume`](crate::volume::Volume) entity by the plugin
/// once its async task finishes, and consumed by the upload system.
#[derive(Component, Clone, Debug, Default)]
pub struct GeneratedMesh {
    /// Vertex positions: `[[x, y, z], ...]`
    pub vertices: Vec<[f32; 3]>,
    /// Triangle indices into `vertices`, three per triangle.
    pub indices: Vec<u32>,
    /// Per-vertex face normals, three identical entries per triangle.
    pub normals: Vec<[f32; 3]>,
}

impl GeneratedMesh {
    /// Builds a mesh from a flat triangle-vertex buffer.
    ///
    /// Returns [`MarchingCubesError::PartialTriangle`] if `vertices` is
    /// not a multiple of 3 long.
    pub fn build(vertices: Vec<[f32; 3]>) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(MarchingCubesError::PartialTriangle);
        }

        let indices: Vec<u32> = (0..vertices.len() as u32).collect();

        let mut normals = Vec::with_capacity(vertices.len());
        for tri in vertices.chunks_exact(3) {
            let n = face_normal(tri[0], tri[1], tri[2]);
            normals.push(n);
            normals.push(n);
            normals.push(n);
        }

        Ok(Self {
            vertices,
            indices,
            normals,
        })
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when the pass produced no triangles — a valid result for a
    /// field entirely on one side of the isolevel.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Unit face normal of the triangle `a, b, c`, or the zero vector if the
/// triangle is degenerate.
fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let ab = Vector::new(b[0] - a[0], b[1] - a[1], b[2] - a[2]);
    let bc = Vector::new(c[0] - b[0], c[1] - b[1], c[2] - b[2]);

    let cross = ab.cross(&bc);
    let norm = cross.norm();
    if norm == 0.0 {
        [0.0, 0.0, 0.0]
    } else {
        (cross / norm).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_assigns_sequential_indices() {
        let mesh = GeneratedMesh::build(vec![
            [0., 0., 0.],
            [1., 0., 0.],
            [0., 1., 0.],
            [0., 0., 1.],
            [1., 0., 1.],
            [0., 1., 1.],
        ])
        .unwrap();

        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn build_rejects_partial_triangles() {
        let result = GeneratedMesh::build(vec![[0., 0., 0.], [1., 0., 0.]]);
        assert!(matches!(result, Err(MarchingCubesError::PartialTriangle)));
    }

    #[test]
    fn empty_mesh_is_valid() {
        let mesh = GeneratedMesh::build(Vec::new()).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.normals.is_empty());
    }

    #[test]
    fn normals_are_flat_per_face() {
        let mesh =
            GeneratedMesh::build(vec![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]]).unwrap();
        assert_eq!(mesh.normals.len(), 3);
        for n in &mesh.normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn degenerate_triangle_gets_zero_normal() {
        let mesh =
            GeneratedMesh::build(vec![[0., 0., 0.], [0., 0., 0.], [0., 0., 0.]]).unwrap();
        assert_eq!(mesh.normals[0], [0.0, 0.0, 0.0]);
    }
}
