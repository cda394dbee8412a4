use ndarray::Array3;

use crate::types::Value;

/// A 3D grid of scalar samples, indexed `(x, y, z)`.
///
/// Sizes are sample counts per axis. A field of size `n` on an axis has
/// `n - 1` marching cubes cells along that axis; the triangulator never
/// touches a cell whose `+1` corner would leave the grid.
#[derive(Clone, Debug)]
pub struct ScalarField {
    values: Array3<Value>,
}

impl ScalarField {
    /// Creates a field of the given sample counts, all values `0.0`.
    pub fn new(size_x: usize, size_y: usize, size_z: usize) -> Self {
        Self {
            values: Array3::zeros((size_x, size_y, size_z)),
        }
    }

    /// Creates a field by evaluating `f(x, y, z)` at every sample.
    pub fn from_fn<F>(size_x: usize, size_y: usize, size_z: usize, f: F) -> Self
    where
        F: Fn(usize, usize, usize) -> Value,
    {
        Self {
            values: Array3::from_shape_fn((size_x, size_y, size_z), |(x, y, z)| f(x, y, z)),
        }
    }

    /// Sample counts `(x, y, z)`.
    pub fn size(&self) -> (usize, usize, usize) {
        self.values.dim()
    }

    /// Marching cubes cell counts per axis: one less than the sample
    /// count, saturating at zero for degenerate axes.
    pub fn cells(&self) -> (usize, usize, usize) {
        let (sx, sy, sz) = self.size();
        (
            sx.saturating_sub(1),
            sy.saturating_sub(1),
            sz.saturating_sub(1),
        )
    }

    /// Returns the sample at `(x, y, z)`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Value {
        self.values[[x, y, z]]
    }

    /// Sets the sample at `(x, y, z)`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn set(&mut self, x: usize, y: usize, z: usize, v: Value) {
        self.values[[x, y, z]] = v;
    }

    /// Calls `f(x, y, z, &mut value)` for every sample in the grid.
    pub fn fill_with<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, usize, &mut Value),
    {
        for ((x, y, z), v) in self.values.indexed_iter_mut() {
            f(x, y, z, v);
        }
    }

    /// Smallest and largest sample in the field, or `None` if the field
    /// is empty. Used by the debug point renderer to normalise colors.
    pub fn value_range(&self) -> Option<(Value, Value)> {
        self.values.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_field_is_zeroed() {
        let field = ScalarField::new(3, 4, 5);
        assert_eq!(field.size(), (3, 4, 5));
        assert_eq!(field.get(2, 3, 4), 0.0);
    }

    #[test]
    fn from_fn_evaluates_per_sample() {
        let field = ScalarField::from_fn(2, 2, 2, |x, y, z| (x + 2 * y + 4 * z) as Value);
        assert_eq!(field.get(0, 0, 0), 0.0);
        assert_eq!(field.get(1, 1, 1), 7.0);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut field = ScalarField::new(2, 2, 2);
        field.set(1, 0, 1, -2.5);
        assert_eq!(field.get(1, 0, 1), -2.5);
    }

    #[test]
    fn cells_saturate_on_degenerate_axes() {
        assert_eq!(ScalarField::new(15, 15, 15).cells(), (14, 14, 14));
        assert_eq!(ScalarField::new(1, 8, 0).cells(), (0, 7, 0));
    }

    #[test]
    fn value_range_spans_the_samples() {
        let mut field = ScalarField::new(2, 2, 2);
        field.set(0, 0, 0, -3.0);
        field.set(1, 1, 1, 9.0);
        assert_eq!(field.value_range(), Some((-3.0, 9.0)));
        assert_eq!(ScalarField::new(0, 0, 0).value_range(), None);
    }
}
