use std::sync::Arc;

use bevy::prelude::*;

use crate::{field::ScalarField, interp::VertexPlacement, types::Value};

/// A scalar field volume that the plugin turns into an isosurface mesh.
///
/// The field is wrapped in an [`Arc`] so the async mesh-generation task
/// can hold a reference to the samples without copying them.
#[derive(Component)]
#[require(Transform)]
pub struct Volume {
    /// Iso-surface threshold — samples strictly below it are "inside".
    pub isolevel: Value,
    /// World-space size of each cell edge.
    pub scale: Value,
    /// Vertex placement mode for crossed edges.
    pub placement: VertexPlacement,
    /// The sampled scalar field.
    pub field: Arc<ScalarField>,
}

impl Volume {
    /// Wraps a populated field with default isolevel `0.0`, unit scale
    /// and interpolated vertex placement.
    pub fn new(field: ScalarField) -> Self {
        Self {
            isolevel: 0.,
            scale: 1.,
            placement: VertexPlacement::default(),
            field: Arc::new(field),
        }
    }

    /// Respawns a volume around a previously saved [`Arc`] of samples,
    /// with no deep copy:
    ///
    /// ```rust,ignore
    /// // Before despawning — store the Arc, not the data:
    /// let saved = Arc::clone(&volume.field);
    /// commands.entity(entity).despawn();
    ///
    /// // Later, respawn with zero allocation:
    /// commands.spawn(Volume::from_shared(saved).with_isolevel(0.5));
    /// ```
    pub fn from_shared(field: Arc<ScalarField>) -> Self {
        Self {
            isolevel: 0.,
            scale: 1.,
            placement: VertexPlacement::default(),
            field,
        }
    }

    /// Sets the iso-surface threshold.
    pub fn with_isolevel(mut self, isolevel: Value) -> Self {
        self.isolevel = isolevel;
        self
    }

    /// Sets the world-space size of each cell edge.
    pub fn with_scale(mut self, scale: Value) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the vertex placement mode.
    ///
    /// [`VertexPlacement::Midpoint`] trades isosurface accuracy for a
    /// cheaper, visibly blocky preview.
    pub fn with_placement(mut self, placement: VertexPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Returns a mutable reference to the field.
    ///
    /// If the Arc is shared this will clone the samples first
    /// (copy-on-write).
    pub fn field_mut(&mut self) -> &mut ScalarField {
        Arc::make_mut(&mut self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_parameters() {
        let volume = Volume::new(ScalarField::new(2, 2, 2))
            .with_isolevel(0.5)
            .with_scale(2.0)
            .with_placement(VertexPlacement::Midpoint);

        assert_eq!(volume.isolevel, 0.5);
        assert_eq!(volume.scale, 2.0);
        assert_eq!(volume.placement, VertexPlacement::Midpoint);
    }

    #[test]
    fn field_mut_copies_on_write_when_shared() {
        let mut volume = Volume::new(ScalarField::new(2, 2, 2));
        let saved = Arc::clone(&volume.field);

        volume.field_mut().set(0, 0, 0, 7.0);
        assert_eq!(volume.field.get(0, 0, 0), 7.0);
        // the saved handle still sees the original samples
        assert_eq!(saved.get(0, 0, 0), 0.0);
    }
}
