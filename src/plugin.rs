use std::sync::Arc;

use bevy::{
    asset::RenderAssetUsages,
    mesh::{Indices, PrimitiveTopology},
    prelude::*,
    tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future},
};

use crate::{
    error::Result, march::triangulate_with, mesh::GeneratedMesh, volume::Volume,
};

/// System sets for the isosurface pipeline.
///
/// Use these to order your own systems relative to mesh generation:
///
/// ```rust,ignore
/// // Run after geometry is ready but before it's uploaded — ideal for collider generation:
/// app.add_systems(Update, build_collider.after(IsosurfaceSet::Generate)
///                                       .before(IsosurfaceSet::Upload));
/// ```
///
/// ```text
/// IsosurfaceSet::Spawn  →  [async compute]  →  IsosurfaceSet::Generate  →  [your systems]  →  IsosurfaceSet::Upload
/// ```
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum IsosurfaceSet {
    /// Spawns an async compute task for each queued volume.
    Spawn,
    /// Polls async tasks and inserts [`GeneratedMesh`] on completion.
    Generate,
    /// Uploads [`GeneratedMesh`] data into a Bevy [`Mesh3d`] and removes [`GeneratedMesh`].
    Upload,
}

/// Marker component added to [`Volume`] entities that are waiting to be processed.
///
/// Removed automatically once the volume's mesh has been generated and uploaded.
#[derive(Component)]
pub struct QueuedVolume;

/// Holds the in-flight async compute task for a [`Volume`].
///
/// Inserted by [`IsosurfaceSet::Spawn`], removed once the task completes
/// and [`GeneratedMesh`] has been inserted by [`IsosurfaceSet::Generate`].
#[derive(Component)]
pub struct ComputeTask(Task<Result<GeneratedMesh>>);

/// Marker enabling the per-sample debug point renderer on a [`Volume`].
#[cfg(feature = "field_gizmos")]
#[derive(Component)]
pub struct ShowFieldPoints;

/// Runtime configuration for the isosurface pipeline.
///
/// Inserted as a resource by [`IsosurfacePlugin`]. Modify it at any time to change behaviour:
///
/// ```rust,ignore
/// app.add_plugins(IsosurfacePlugin { max_tasks_per_frame: 8, ..default() });
///
/// // Or change it at runtime:
/// fn my_system(mut config: ResMut<IsosurfaceConfig>) {
///     config.max_tasks_per_frame = 1; // throttle while the player is in combat
/// }
/// ```
#[derive(Resource)]
pub struct IsosurfaceConfig {
    /// Maximum number of async mesh tasks spawned per frame.
    ///
    /// Higher values regenerate volumes faster but may cause frame hitches when many
    /// are queued at once. Default: `4`.
    pub max_tasks_per_frame: usize,
}

impl Default for IsosurfaceConfig {
    fn default() -> Self {
        Self {
            max_tasks_per_frame: 4,
        }
    }
}

/// Bevy plugin that drives isosurface mesh extraction.
///
/// When the `auto_queue` feature is enabled, any [`Volume`] added to the world is
/// automatically processed. Triangulation runs on Bevy's `AsyncComputeTaskPool`
/// so the main thread is never blocked:
///
/// ```text
/// Volume added
///   → QueuedVolume inserted         (on_volume_add)
///   → ComputeTask spawned           (IsosurfaceSet::Spawn)
///   → [async compute runs]
///   → GeneratedMesh inserted        (IsosurfaceSet::Generate, once task completes)
///   → [your collider systems here]
///   → Mesh3d inserted               (IsosurfaceSet::Upload)
///   → QueuedVolume + GeneratedMesh removed
/// ```
pub struct IsosurfacePlugin {
    /// Initial value for [`IsosurfaceConfig::max_tasks_per_frame`].
    pub max_tasks_per_frame: usize,
}

impl Default for IsosurfacePlugin {
    fn default() -> Self {
        Self {
            max_tasks_per_frame: IsosurfaceConfig::default().max_tasks_per_frame,
        }
    }
}

impl Plugin for IsosurfacePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(IsosurfaceConfig {
            max_tasks_per_frame: self.max_tasks_per_frame,
        });

        #[cfg(feature = "auto_queue")]
        app.configure_sets(
            Update,
            (
                IsosurfaceSet::Spawn,
                IsosurfaceSet::Generate,
                IsosurfaceSet::Upload,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                on_volume_add,
                spawn_mesh_tasks.in_set(IsosurfaceSet::Spawn),
                poll_mesh_tasks.in_set(IsosurfaceSet::Generate),
                upload_mesh.in_set(IsosurfaceSet::Upload),
            ),
        );

        #[cfg(feature = "field_gizmos")]
        app.add_systems(Update, draw_field_points);
    }
}

/// Inserts [`QueuedVolume`] on every newly added [`Volume`] that doesn't already have it.
fn on_volume_add(
    mut commands: Commands,
    query: Query<Entity, (Added<Volume>, Without<QueuedVolume>)>,
) {
    for entity in query.iter() {
        commands.entity(entity).insert(QueuedVolume);
    }
}

/// Spawns async compute tasks for [`QueuedVolume`]s, up to [`IsosurfaceConfig::max_tasks_per_frame`] per frame.
fn spawn_mesh_tasks(
    mut commands: Commands,
    config: Res<IsosurfaceConfig>,
    query: Query<(Entity, &Volume), (With<QueuedVolume>, Without<ComputeTask>, Without<Mesh3d>)>,
) {
    let task_pool = AsyncComputeTaskPool::get();

    for (entity, volume) in query.iter().take(config.max_tasks_per_frame) {
        // Arc::clone is a single pointer bump — no heap allocation on the main thread.
        let isolevel = volume.isolevel;
        let scale = volume.scale;
        let placement = volume.placement;
        let field = Arc::clone(&volume.field);

        let task =
            task_pool.spawn(async move { triangulate_with(&field, isolevel, scale, placement) });

        commands.entity(entity).insert(ComputeTask(task));
    }
}

/// Polls in-flight [`ComputeTask`]s each frame and inserts [`GeneratedMesh`] on completion.
///
/// Non-blocking: tasks that haven't finished are skipped and retried next frame.
/// A failed task is logged and its volume dequeued without a mesh.
fn poll_mesh_tasks(mut commands: Commands, mut query: Query<(Entity, &mut ComputeTask)>) {
    for (entity, mut compute_task) in query.iter_mut() {
        let Some(result) = block_on(future::poll_once(&mut compute_task.0)) else {
            continue;
        };

        match result {
            Ok(generated_mesh) => {
                commands
                    .entity(entity)
                    .insert(generated_mesh)
                    .remove::<ComputeTask>();
            }
            Err(e) => {
                error!("isosurface extraction failed: {e}");
                commands
                    .entity(entity)
                    .remove::<ComputeTask>()
                    .remove::<QueuedVolume>();
            }
        }
    }
}

/// Uploads a [`GeneratedMesh`] into a Bevy [`Mesh3d`], then removes [`GeneratedMesh`] and [`QueuedVolume`].
///
/// A zero-triangle mesh is "nothing to display": the volume is dequeued
/// without inserting a [`Mesh3d`].
///
/// The three vertex data Vecs are **moved** directly into the Bevy mesh with no copies.
fn upload_mesh(
    mut commands: Commands,
    query: Query<(Entity, &GeneratedMesh), With<QueuedVolume>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (entity, generated) in query.iter() {
        if generated.is_empty() {
            debug!("empty isosurface mesh, nothing to upload");
            commands
                .entity(entity)
                .remove::<GeneratedMesh>()
                .remove::<QueuedVolume>();
            continue;
        }

        let mut bevy_mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD,
        );

        bevy_mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, generated.vertices.clone());
        bevy_mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, generated.normals.clone());
        bevy_mesh.insert_indices(Indices::U32(generated.indices.clone()));

        commands
            .entity(entity)
            .insert(Mesh3d(meshes.add(bevy_mesh)))
            .remove::<GeneratedMesh>()
            .remove::<QueuedVolume>();
    }
}

/// Draws one grayscale gizmo sphere per field sample, colored by the
/// sample's position in the field's value range.
///
/// Purely visual; has no effect on triangulation.
#[cfg(feature = "field_gizmos")]
fn draw_field_points(
    mut gizmos: Gizmos,
    query: Query<(&Volume, &Transform), With<ShowFieldPoints>>,
) {
    use crate::interp::remap;

    for (volume, transform) in query.iter() {
        let Some((lo, hi)) = volume.field.value_range() else {
            continue;
        };
        let range_in = if lo < hi { [lo, hi] } else { [lo, lo + 1.0] };

        let (size_x, size_y, size_z) = volume.field.size();
        for x in 0..size_x {
            for y in 0..size_y {
                for z in 0..size_z {
                    let g = remap(volume.field.get(x, y, z), range_in, [0.0, 1.0]);
                    let local = Vec3::new(x as f32, y as f32, z as f32) * volume.scale;
                    gizmos.sphere(
                        transform.transform_point(local),
                        0.2 * volume.scale,
                        Color::srgb(g, g, g),
                    );
                }
            }
        }
    }
}
