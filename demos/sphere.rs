use bevy::{
    pbr::wireframe::{Wireframe, WireframeConfig},
    prelude::*,
};
use bevy_isosurface::{IsosurfacePlugin, ScalarField, Volume};

const GRID_SIZE: usize = 15;
const RADIUS: f32 = 5.0;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            #[cfg(not(target_arch = "wasm32"))]
            bevy::pbr::wireframe::WireframePlugin::default(),
            IsosurfacePlugin::default(),
        ))
        .insert_resource(WireframeConfig {
            global: true,
            ..Default::default()
        })
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    let center = GRID_SIZE as f32 / 2.0;

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(
            GRID_SIZE as f32 * -1.2,
            GRID_SIZE as f32 * 1.4,
            GRID_SIZE as f32 * -1.2,
        )
        .looking_at(Vec3::splat(center), Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight::default(),
        Transform::default().with_rotation(Quat::from_rotation_x(-45.0_f32.to_radians())),
    ));

    // positive inside the ball, negative outside
    let field = ScalarField::from_fn(GRID_SIZE, GRID_SIZE, GRID_SIZE, |x, y, z| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dz = z as f32 - center;
        RADIUS - (dx * dx + dy * dy + dz * dz).sqrt()
    });

    commands.spawn((Volume::new(field), Wireframe));
}
