use crate::types::{Point, Value};

/// Tolerance for the degenerate-value checks in [`interpolate_edge`].
pub const INTERP_EPSILON: Value = 1e-4;

/// Where along a crossed cube edge the surface vertex is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VertexPlacement {
    /// Linear interpolation to the point where the field crosses the
    /// isolevel. The accurate mode.
    #[default]
    Isolevel,
    /// Midpoint of the edge, ignoring the sampled values. Cheap preview
    /// mode — meshes come out blocky and do not track the isosurface.
    Midpoint,
}

// linearly map a number from one range to another
pub fn remap(s: Value, range_in: [Value; 2], range_out: [Value; 2]) -> Value {
    range_out[0] + (s - range_in[0]) * (range_out[1] - range_out[0]) / (range_in[1] - range_in[0])
}

// Return the interpolation factor t corresponding to iso_val
pub fn find_t(v0: Value, v1: Value, iso_val: Value) -> Value {
    (iso_val - v0) / (v1 - v0)
}

// Linear interpolation
pub fn lerp(a: Value, b: Value, t: Value) -> Value {
    a + (b - a) * t
}

/// Returns the point along the edge `p0 → p1` where the field crosses
/// `isolevel`, given the sampled values `v0` and `v1` at the endpoints.
///
/// Degenerate inputs never divide by a near-zero span; they fall back in
/// this order:
/// 1. `v0` within [`INTERP_EPSILON`] of the isolevel → `p0`
/// 2. `v1` within [`INTERP_EPSILON`] of the isolevel → `p1`
/// 3. `v0` and `v1` within [`INTERP_EPSILON`] of each other → `p0`
pub fn interpolate_edge(p0: Point, v0: Value, p1: Point, v1: Value, isolevel: Value) -> Point {
    if (isolevel - v0).abs() < INTERP_EPSILON {
        return p0;
    }
    if (isolevel - v1).abs() < INTERP_EPSILON {
        return p1;
    }
    if (v0 - v1).abs() < INTERP_EPSILON {
        return p0;
    }
    p0 + (p1 - p0) * find_t(v0, v1, isolevel)
}

/// Midpoint of an edge, for [`VertexPlacement::Midpoint`].
pub fn edge_midpoint(p0: Point, p1: Point) -> Point {
    Point::from((p0.coords + p1.coords) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: Value, y: Value, z: Value) -> Point {
        Point::new(x, y, z)
    }

    #[test]
    fn snaps_to_first_endpoint_on_isolevel() {
        let got = interpolate_edge(p(0., 0., 0.), 0.5, p(1., 0., 0.), 2.0, 0.5);
        assert_eq!(got, p(0., 0., 0.));
    }

    #[test]
    fn snaps_to_second_endpoint_on_isolevel() {
        let got = interpolate_edge(p(0., 0., 0.), -1.0, p(1., 0., 0.), 0.5, 0.5);
        assert_eq!(got, p(1., 0., 0.));
    }

    #[test]
    fn flat_edge_falls_back_to_first_endpoint() {
        // both values equal and away from the isolevel: no crossing to
        // find, and no division happens
        let got = interpolate_edge(p(0., 0., 0.), 3.0, p(1., 0., 0.), 3.0, 0.5);
        assert_eq!(got, p(0., 0., 0.));
        assert!(got.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn every_corner_on_the_isolevel_returns_a_corner() {
        let got = interpolate_edge(p(2., 3., 4.), 1.0, p(2., 4., 4.), 1.0, 1.0);
        assert_eq!(got, p(2., 3., 4.));
    }

    #[test]
    fn interpolates_linearly() {
        let got = interpolate_edge(p(0., 0., 0.), 0.0, p(4., 0., 0.), 1.0, 0.25);
        assert!((got.x - 1.0).abs() < 1e-6);
        assert_eq!((got.y, got.z), (0.0, 0.0));
    }

    #[test]
    fn symmetric_in_endpoint_order() {
        let (a, b) = (p(1., 2., 3.), p(4., 2., 3.));
        let (va, vb) = (-0.7, 1.3);
        let ab = interpolate_edge(a, va, b, vb, 0.1);
        let ba = interpolate_edge(b, vb, a, va, 0.1);
        assert!((ab - ba).norm() < 1e-5);
    }

    #[test]
    fn midpoint_ignores_values() {
        let got = edge_midpoint(p(0., 0., 0.), p(2., 4., 6.));
        assert_eq!(got, p(1., 2., 3.));
    }

    #[test]
    fn remap_maps_ranges() {
        assert_eq!(remap(5.0, [0.0, 10.0], [0.0, 1.0]), 0.5);
        assert_eq!(remap(0.0, [-1.0, 1.0], [0.0, 100.0]), 50.0);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }
}
