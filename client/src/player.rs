use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use sim::{FirstPersonModel, Mover, MoverVolume, Pose, RenderInterpolator, TickInput};

use crate::{
    clock::{SimSystems, SimTimeline},
    config::MoverSettings,
    convert::to_bevy_transform,
    input::{InputAction, tick_input},
    level::CollisionWorld,
};

const CAPSULE_RADIUS: f32 = 0.3;
const CAPSULE_HALF_HEIGHT: f32 = 0.5;

#[derive(Component)]
pub struct Player;

/// Authoritative simulation state, stepped in `FixedUpdate`.
#[derive(Component)]
pub struct PlayerMover(pub Mover<FirstPersonModel>);

#[derive(Component)]
pub struct Interpolated(pub RenderInterpolator);

/// Latest input, consumed by every fixed tick until replaced.
#[derive(Component, Default)]
pub struct BufferedInput(pub TickInput);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_player);
    app.add_systems(
        FixedUpdate,
        (
            step_movers.in_set(SimSystems::Step),
            rotate_snapshots.in_set(SimSystems::Snapshot),
        ),
    );
    app.add_systems(
        Update,
        (
            (buffer_input, toggle_interpolation).before(SimSystems::Interpolate),
            interpolate_transforms.in_set(SimSystems::Interpolate),
        ),
    );
}

pub fn player_volume() -> MoverVolume {
    MoverVolume::capsule_y(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS)
}

/// Standing on the ground at the room's center, facing +Z in simulation space.
pub fn spawn_pose() -> Pose {
    Pose::from_translation(sim::Vec3::new(
        0.0,
        CAPSULE_HALF_HEIGHT + CAPSULE_RADIUS + 0.01,
        0.0,
    ))
}

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<MoverSettings>,
) {
    let pose = spawn_pose();
    let mover = match Mover::new(
        FirstPersonModel,
        pose,
        Some(player_volume()),
        settings.tuning,
        settings.mover,
    ) {
        Ok(mover) => mover,
        Err(e) => {
            error!("Could not create the player mover: {e}");
            return;
        }
    };

    commands.spawn((
        Name::new("Player"),
        Player,
        PlayerMover(mover),
        Interpolated(RenderInterpolator::new(pose)),
        BufferedInput::default(),
        Mesh3d(meshes.add(Capsule3d::new(CAPSULE_RADIUS, 2.0 * CAPSULE_HALF_HEIGHT))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.45, 0.2),
            ..default()
        })),
        to_bevy_transform(&pose),
    ));
}

fn buffer_input(
    actions: Res<ActionState<InputAction>>,
    mut inputs: Query<&mut BufferedInput, With<Player>>,
) {
    let input = tick_input(&actions);
    for mut buffered in &mut inputs {
        buffered.0 = input;
    }
}

fn step_movers(
    time: Res<Time>,
    world: Res<CollisionWorld>,
    mut movers: Query<(&mut PlayerMover, &BufferedInput)>,
) {
    let dt = time.delta_secs();
    for (mut mover, input) in &mut movers {
        let report = mover.0.step(&world.0, &input.0, dt);
        if report.corrections > 0 {
            trace!(
                "Resolved {} contacts, blocked axes {:#05b}",
                report.corrections, report.blocked.bits
            );
        }
    }
}

fn rotate_snapshots(mut movers: Query<(&PlayerMover, &mut Interpolated)>) {
    for (mover, mut interpolated) in &mut movers {
        interpolated.0.on_fixed_tick(*mover.0.pose());
    }
}

fn interpolate_transforms(
    timeline: Res<SimTimeline>,
    mut movers: Query<(&PlayerMover, &Interpolated, &mut Transform)>,
) {
    let factor = timeline.0.factor();
    for (mover, interpolated, mut transform) in &mut movers {
        let pose = interpolated.0.visual_pose(factor, mover.0.pose());
        *transform = to_bevy_transform(&pose);
    }
}

fn toggle_interpolation(
    actions: Res<ActionState<InputAction>>,
    mut movers: Query<(&PlayerMover, &mut Interpolated)>,
) {
    if !actions.just_pressed(&InputAction::ToggleInterpolation) {
        return;
    }
    for (mover, mut interpolated) in &mut movers {
        let enabled = !interpolated.0.is_enabled();
        interpolated.0.set_enabled(enabled, *mover.0.pose());
        info!(
            "Render interpolation {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }
}
