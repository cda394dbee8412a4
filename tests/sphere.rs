//! End-to-end extraction of a sphere, checked against ground truth.

use bevy_isosurface::{ScalarField, VertexPlacement, triangulate, triangulate_with};

const SIZE: usize = 15;
const RADIUS: f32 = 5.0;
const CENTER: (f32, f32, f32) = (7.0, 7.0, 7.0);

/// `radius - distance_to_center`: positive inside the ball, zero on the
/// sphere, negative outside.
fn sphere_field() -> ScalarField {
    ScalarField::from_fn(SIZE, SIZE, SIZE, |x, y, z| {
        let dx = x as f32 - CENTER.0;
        let dy = y as f32 - CENTER.1;
        let dz = z as f32 - CENTER.2;
        RADIUS - (dx * dx + dy * dy + dz * dz).sqrt()
    })
}

fn distance_to_center(v: &[f32; 3]) -> f32 {
    let dx = v[0] - CENTER.0;
    let dy = v[1] - CENTER.1;
    let dz = v[2] - CENTER.2;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[test]
fn sphere_mesh_is_non_empty_and_well_formed() {
    let mesh = triangulate(&sphere_field(), 0.0).unwrap();

    assert!(!mesh.is_empty());
    assert_eq!(mesh.vertices.len() % 3, 0);
    assert_eq!(mesh.indices.len(), mesh.vertices.len());
    assert_eq!(mesh.normals.len(), mesh.vertices.len());

    // a radius-5 sphere sampled at unit resolution triangulates to a few
    // hundred cells' worth of geometry at minimum
    assert!(
        mesh.triangle_count() > 100,
        "suspiciously coarse sphere: {} triangles",
        mesh.triangle_count()
    );
}

#[test]
fn sphere_vertices_lie_on_the_sphere() {
    let mesh = triangulate(&sphere_field(), 0.0).unwrap();

    // linear interpolation of an exact distance field on unit edges stays
    // within a few hundredths of the true surface
    for v in &mesh.vertices {
        let d = distance_to_center(v);
        assert!(
            (d - RADIUS).abs() < 0.2,
            "vertex {v:?} is {d} from the center, expected ~{RADIUS}"
        );
    }
}

#[test]
fn sphere_counts_are_stable_across_runs() {
    let field = sphere_field();
    let a = triangulate(&field, 0.0).unwrap();
    let b = triangulate(&field, 0.0).unwrap();

    assert_eq!(a.vertices, b.vertices);
    assert_eq!(a.indices, b.indices);
    assert_eq!(a.normals, b.normals);
}

#[test]
fn midpoint_preview_keeps_the_topology() {
    let field = sphere_field();
    let precise = triangulate(&field, 0.0).unwrap();
    let blocky = triangulate_with(&field, 0.0, 1.0, VertexPlacement::Midpoint).unwrap();

    // same cells cross the surface, so the triangle count matches even
    // though vertex placement differs
    assert_eq!(precise.triangle_count(), blocky.triangle_count());
    assert_ne!(precise.vertices, blocky.vertices);
}
