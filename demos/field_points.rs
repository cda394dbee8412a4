//! Renders the raw field samples as grayscale points alongside the mesh.
//!
//! Run with `--features field_gizmos`.

use bevy::prelude::*;
use bevy_isosurface::{
    IsosurfacePlugin, ScalarField, Volume, plugin::ShowFieldPoints,
};
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};

const GRID_SIZE: usize = 15;
const RADIUS: f32 = 5.0;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            IsosurfacePlugin::default(),
            PanOrbitCameraPlugin,
        ))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    let center = GRID_SIZE as f32 / 2.0;

    commands.spawn((
        Camera3d::default(),
        PanOrbitCamera::default(),
        Transform::from_xyz(30.0, 25.0, 30.0).looking_at(Vec3::splat(center), Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight::default(),
        Transform::default().with_rotation(Quat::from_rotation_x(-45.0_f32.to_radians())),
    ));

    let field = ScalarField::from_fn(GRID_SIZE, GRID_SIZE, GRID_SIZE, |x, y, z| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dz = z as f32 - center;
        RADIUS - (dx * dx + dy * dy + dz * dz).sqrt()
    });

    commands.spawn((Volume::new(field), ShowFieldPoints));
}
