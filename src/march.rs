use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::debug;

use crate::{
    cube::{classify, corner_positions, edge_crossings, emit_triangles},
    error::Result,
    field::ScalarField,
    interp::VertexPlacement,
    mesh::GeneratedMesh,
    tables::{CORNER_OFFSETS, EDGE_TABLE},
    types::Value,
};

/// Upper bound of vertices a single cell can emit (5 triangles).
const MAX_VERTS_PER_CELL: usize = 15;

/// Extracts the isosurface of `field` at `isolevel`.
///
/// Grid-unit cell size, interpolated vertex placement. Shorthand for
/// [`triangulate_with`] with `scale = 1.0` and
/// [`VertexPlacement::Isolevel`].
pub fn triangulate(field: &ScalarField, isolevel: Value) -> Result<GeneratedMesh> {
    triangulate_with(field, isolevel, 1.0, VertexPlacement::Isolevel)
}

/// Extracts the isosurface of `field` at `isolevel`, with each cell edge
/// `scale` world units long and the given vertex placement mode.
///
/// Visits every cell whose 8 corners are in bounds — cell coordinates
/// range over `[0, size-2]` per axis, so a field with fewer than 2
/// samples on any axis yields an empty mesh. Buffers are rebuilt from
/// scratch on every call; two passes over the same inputs produce
/// identical output.
///
/// Work is parallelised over X slices. Slice buffers are concatenated in
/// cell-visitation order, so the result matches a sequential pass.
///
/// ```text
/// Per cell:
/// 1. corner_positions            →  8 world-space points
/// 2. field.get (×8)              →  8 scalar samples
/// 3. classify                    →  256-entry lookup key
/// 4. EDGE_TABLE[config]          →  bitmask of crossed edges
/// 5. edge_crossings              →  up to 12 placed vertices
/// 6. emit_triangles              →  triangle vertices from TRI_TABLE
/// ```
pub fn triangulate_with(
    field: &ScalarField,
    isolevel: Value,
    scale: Value,
    placement: VertexPlacement,
) -> Result<GeneratedMesh> {
    let (cells_x, cells_y, cells_z) = field.cells();

    let per_x: Vec<Vec<[f32; 3]>> = (0..cells_x)
        .into_par_iter()
        .map(|x| {
            let mut local: Vec<[f32; 3]> =
                Vec::with_capacity(cells_y * cells_z * MAX_VERTS_PER_CELL);

            for y in 0..cells_y {
                for z in 0..cells_z {
                    march_cell(field, x, y, z, isolevel, scale, placement, &mut local)?;
                }
            }
            Ok(local)
        })
        .collect::<Result<_>>()?;

    // Merge per-X slices into a single vertex buffer
    let total: usize = per_x.iter().map(|v| v.len()).sum();
    let mut vertices: Vec<[f32; 3]> = Vec::with_capacity(total);
    for mut v in per_x {
        vertices.append(&mut v);
    }

    debug!(
        cells = cells_x * cells_y * cells_z,
        triangles = vertices.len() / 3,
        "triangulated scalar field"
    );

    GeneratedMesh::build(vertices)
}

/// Runs one cell through the classify/interpolate/emit pipeline,
/// appending any triangle vertices to `out`.
fn march_cell(
    field: &ScalarField,
    x: usize,
    y: usize,
    z: usize,
    isolevel: Value,
    scale: Value,
    placement: VertexPlacement,
    out: &mut Vec<[f32; 3]>,
) -> Result<()> {
    let mut corner_values = [0.0; 8];
    for (i, [dx, dy, dz]) in CORNER_OFFSETS.iter().enumerate() {
        corner_values[i] = field.get(x + dx, y + dy, z + dz);
    }

    let config = classify(&corner_values, isolevel)?;
    if config == 0 || config == 255 {
        // cell entirely on one side of the surface
        return Ok(());
    }

    let positions = corner_positions(x, y, z, scale);
    let crossings = edge_crossings(
        EDGE_TABLE[config],
        &positions,
        &corner_values,
        isolevel,
        placement,
    );

    emit_triangles(&crossings, config, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2×2×2 field (a single cell) with only corner 0 inside.
    fn single_corner_field() -> ScalarField {
        let mut field = ScalarField::from_fn(2, 2, 2, |_, _, _| 1.0);
        field.set(0, 0, 0, -1.0);
        field
    }

    #[test]
    fn single_inside_corner_yields_one_triangle() {
        let mesh = triangulate(&single_corner_field(), 0.0).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.normals.len(), 3);
    }

    #[test]
    fn uniform_field_yields_empty_mesh() {
        let field = ScalarField::from_fn(4, 4, 4, |_, _, _| 2.0);
        let mesh = triangulate(&field, 0.5).unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.indices.is_empty());
    }

    #[test]
    fn fully_inside_field_yields_empty_mesh() {
        let field = ScalarField::from_fn(4, 4, 4, |_, _, _| -2.0);
        let mesh = triangulate(&field, 0.5).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn degenerate_grid_yields_empty_mesh() {
        let mesh = triangulate(&ScalarField::new(1, 5, 5), 0.0).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let field = ScalarField::from_fn(8, 8, 8, |x, y, z| {
            let (dx, dy, dz) = (x as f32 - 3.5, y as f32 - 3.5, z as f32 - 3.5);
            (dx * dx + dy * dy + dz * dz).sqrt() - 2.5
        });

        let a = triangulate(&field, 0.0).unwrap();
        let b = triangulate(&field, 0.0).unwrap();
        assert_eq!(a.vertices, b.vertices);
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn scale_multiplies_vertex_positions() {
        let field = single_corner_field();
        let unit = triangulate_with(&field, 0.0, 1.0, VertexPlacement::Isolevel).unwrap();
        let double = triangulate_with(&field, 0.0, 2.0, VertexPlacement::Isolevel).unwrap();

        for (u, d) in unit.vertices.iter().zip(double.vertices.iter()) {
            for axis in 0..3 {
                assert!((u[axis] * 2.0 - d[axis]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn midpoint_and_isolevel_modes_differ_off_center() {
        // corner 0 at -3, neighbours at 1: crossing sits at t = 0.75,
        // not at the edge midpoint
        let mut field = ScalarField::from_fn(2, 2, 2, |_, _, _| 1.0);
        field.set(0, 0, 0, -3.0);

        let precise = triangulate_with(&field, 0.0, 1.0, VertexPlacement::Isolevel).unwrap();
        let blocky = triangulate_with(&field, 0.0, 1.0, VertexPlacement::Midpoint).unwrap();

        assert_eq!(precise.vertices.len(), blocky.vertices.len());
        assert_ne!(precise.vertices, blocky.vertices);
        for v in &blocky.vertices {
            let on_half_axis = v.iter().filter(|&&c| c == 0.5).count();
            assert_eq!(on_half_axis, 1);
        }
    }
}
