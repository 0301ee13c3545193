use crate::player::Player;
use bevy::{camera::Exposure, prelude::*};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(PostUpdate, follow_player);
}

/// Offset from the player, in the player's frame (behind and above).
const CAMERA_OFFSET_LOCAL: Vec3 = Vec3::new(0.0, 3.0, 7.0);
const CAMERA_LOOK_HEIGHT: f32 = 1.0;
const CAMERA_DECAY_RATE: f32 = 12.0;

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Exposure { ev100: 13.0 },
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Camera3d::default(),
        Transform::from_translation(CAMERA_OFFSET_LOCAL).looking_at(Vec3::ZERO, Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                200.0, // Fog distance
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
    ));
}

/// Chase the player's interpolated transform.
fn follow_player(
    mut camera: Single<&mut Transform, With<Camera3d>>,
    player: Single<&Transform, (With<Player>, Without<Camera3d>)>,
    time: Res<Time>,
) {
    let target = player.translation + player.rotation * CAMERA_OFFSET_LOCAL;
    camera
        .translation
        .smooth_nudge(&target, CAMERA_DECAY_RATE, time.delta_secs());

    let focus = player.translation + Vec3::Y * CAMERA_LOOK_HEIGHT;
    camera.look_at(focus, Vec3::Y);
}
