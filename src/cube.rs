use crate::{
    error::{MarchingCubesError, Result},
    interp::{VertexPlacement, edge_midpoint, interpolate_edge},
    tables::{CORNER_OFFSETS, EDGE_CORNERS, TRI_TABLE},
    types::{Point, Value},
};

/// Computes the 8-bit cube configuration for one cell.
///
/// Each of the 8 corners maps to one bit. A bit is set when the corner's
/// sample is **strictly below** the isolevel ("inside" the surface):
///
/// ```text
/// corner index:  7  6  5  4  3  2  1  0
/// config bits:  [_][_][_][_][_][_][_][_]
///                                      ^-- corner 0 inside?
/// ```
///
/// Returns [`MarchingCubesError::InvalidCorners`] if `corner_values` does
/// not contain exactly 8 values.
#[inline]
pub fn classify(corner_values: &[Value], isolevel: Value) -> Result<usize> {
    if corner_values.len() != 8 {
        return Err(MarchingCubesError::InvalidCorners);
    }

    let mut config: usize = 0;
    for (i, &v) in corner_values.iter().enumerate() {
        if v < isolevel {
            config |= 1 << i;
        }
    }

    Ok(config)
}

/// Returns the 8 world-space corner positions of the cell at grid index
/// `(x, y, z)`, in [`CORNER_OFFSETS`] order.
#[inline]
pub fn corner_positions(x: usize, y: usize, z: usize, scale: Value) -> [Point; 8] {
    CORNER_OFFSETS.map(|[dx, dy, dz]| {
        Point::new(
            (x + dx) as Value * scale,
            (y + dy) as Value * scale,
            (z + dz) as Value * scale,
        )
    })
}

/// Places a surface vertex on each crossed edge of a cell.
///
/// `edges_mask` is the 12-bit field from `EDGE_TABLE` — a set bit means
/// the surface crosses that edge. Uncrossed edges stay `None`.
#[inline]
pub fn edge_crossings(
    edges_mask: u16,
    corner_positions: &[Point; 8],
    corner_values: &[Value; 8],
    isolevel: Value,
    placement: VertexPlacement,
) -> [Option<Point>; 12] {
    let mut crossings: [Option<Point>; 12] = [None; 12];

    for (e, &[a, b]) in EDGE_CORNERS.iter().enumerate() {
        if edges_mask & (1 << e) == 0 {
            continue;
        }

        let (pa, pb) = (corner_positions[a], corner_positions[b]);
        crossings[e] = Some(match placement {
            VertexPlacement::Isolevel => {
                interpolate_edge(pa, corner_values[a], pb, corner_values[b], isolevel)
            }
            VertexPlacement::Midpoint => edge_midpoint(pa, pb),
        });
    }

    crossings
}

/// Appends the triangle vertices for `config` to `out`.
///
/// `TRI_TABLE[config]` holds edge indices in groups of three, terminated
/// by `-1`:
/// ```text
/// TRI_TABLE[config] = [e0, e1, e2,  e3, e4, e5,  -1, ...]
///                      \___tri0__/   \___tri1__/
/// ```
/// Each edge index maps into `crossings` to retrieve the placed vertex.
#[inline]
pub fn emit_triangles(
    crossings: &[Option<Point>; 12],
    config: usize,
    out: &mut Vec<[f32; 3]>,
) -> Result<()> {
    for &e in TRI_TABLE[config].iter().take_while(|&&e| e != -1) {
        let vertex = crossings[e as usize].ok_or(MarchingCubesError::MissingCrossing)?;
        out.push(vertex.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::EDGE_TABLE;

    #[test]
    fn classify_sets_one_bit_per_inside_corner() {
        let mut values = [1.0; 8];
        values[3] = -1.0;
        assert_eq!(classify(&values, 0.0).unwrap(), 1 << 3);
    }

    #[test]
    fn classify_all_outside_is_zero() {
        assert_eq!(classify(&[1.0; 8], 0.0).unwrap(), 0);
    }

    #[test]
    fn classify_all_inside_is_255() {
        assert_eq!(classify(&[-1.0; 8], 0.0).unwrap(), 255);
    }

    #[test]
    fn classify_on_the_isolevel_counts_as_outside() {
        // strictly-below convention: a corner exactly at the isolevel is
        // not inside
        assert_eq!(classify(&[0.0; 8], 0.0).unwrap(), 0);
    }

    #[test]
    fn classify_rejects_wrong_corner_count() {
        assert!(matches!(
            classify(&[0.0; 7], 0.0),
            Err(MarchingCubesError::InvalidCorners)
        ));
    }

    #[test]
    fn corner_positions_apply_scale() {
        let positions = corner_positions(1, 0, 2, 0.5);
        assert_eq!(positions[0], Point::new(0.5, 0.0, 1.0));
        assert_eq!(positions[6], Point::new(1.0, 0.5, 1.5));
    }

    #[test]
    fn single_corner_config_emits_one_triangle() {
        let config = 1usize; // only corner 0 inside
        let mut values = [1.0; 8];
        values[0] = -1.0;
        let positions = corner_positions(0, 0, 0, 1.0);
        let crossings = edge_crossings(
            EDGE_TABLE[config],
            &positions,
            &values,
            0.0,
            VertexPlacement::Isolevel,
        );

        let mut out = Vec::new();
        emit_triangles(&crossings, config, &mut out).unwrap();
        assert_eq!(out.len(), 3);
        // corner 0 touches edges 0, 3 and 8; with symmetric values every
        // crossing sits at the edge midpoint
        for v in out {
            let on_half_axis = v.iter().filter(|&&c| c == 0.5).count();
            assert_eq!(on_half_axis, 1, "vertex {v:?} not on an edge midpoint");
        }
    }

    #[test]
    fn uncrossed_edges_stay_empty() {
        let values = [1.0; 8];
        let positions = corner_positions(0, 0, 0, 1.0);
        let crossings = edge_crossings(0, &positions, &values, 0.0, VertexPlacement::Isolevel);
        assert!(crossings.iter().all(Option::is_none));
    }
}
