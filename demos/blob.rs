use bevy::prelude::*;
use bevy_isosurface::{IsosurfacePlugin, ScalarField, Volume};
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};

const GRID_SIZE: usize = 48;

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

/// Classic metaball field: each ball contributes `r² / |p - c|²`, summed.
fn metaballs(x: f32, y: f32, z: f32) -> f32 {
    const BALLS: [([f32; 3], f32); 3] = [
        ([18.0, 24.0, 24.0], 7.0),
        ([30.0, 22.0, 24.0], 6.0),
        ([24.0, 32.0, 24.0], 5.0),
    ];

    let mut sum = 0.0;
    for (c, r) in BALLS {
        let d2 = (x - c[0]).powi(2) + (y - c[1]).powi(2) + (z - c[2]).powi(2);
        sum += r * r / d2.max(1e-3);
    }
    // flip so the blob interior is below the isolevel
    1.0 - sum
}

fn setup(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        PanOrbitCamera {
            button_orbit: MouseButton::Right,
            button_pan: MouseButton::Middle,
            ..default()
        },
        Transform::from_xyz(60.0, 50.0, 60.0).looking_at(Vec3::splat(24.0), Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: light_consts::lux::FULL_DAYLIGHT,
            ..Default::default()
        },
        Transform::default().with_rotation(Quat::from_rotation_x(-45.0_f32.to_radians())),
    ));

    let field = ScalarField::from_fn(GRID_SIZE, GRID_SIZE, GRID_SIZE, |x, y, z| {
        metaballs(x as f32, y as f32, z as f32)
    });

    commands.spawn((
        Volume::new(field),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.4, 0.7, 0.9),
            ..Default::default()
        })),
    ));
}
