use crate::{
    bitmask_flags::BlockedAxes,
    collision::{CollisionQuery, resolve},
    mover::{Mover, TickInput},
    types::{Quat, Vec3},
    velocity::MovementModel,
};

/// Output of a single `step_movement()` tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Distance between the previous and the committed translation (meters).
    pub moved: f32,
    /// Local axes blocked by contacts this tick.
    pub blocked: BlockedAxes,
    /// Whether the depenetration resolver ran.
    pub collided: bool,
    /// Corrections applied by the resolver.
    pub corrections: u32,
}

/// Advance one mover by one fixed tick.
///
/// Behavior
/// - The movement model turns input into the new local velocity.
/// - Horizontal look input sets the yaw rate, which is integrated into the orientation.
/// - Position integrates along the rotated local axes; skipped at zero velocity.
/// - The resolver corrects the tentative position. It runs even at rest, so geometry that
///   appears around a resting mover still pushes it out.
/// - With `reset_speed_on_contact`, velocity on blocked local axes is zeroed.
/// - The corrected pose is committed.
pub fn step_movement<M: MovementModel, Q: CollisionQuery>(
    mover: &mut Mover<M>,
    query: &Q,
    input: &TickInput,
    dt: f32,
) -> StepReport {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let state = &mut mover.state;
    let start = state.pose.translation;

    // 1) Velocity.
    state.velocity = mover
        .model
        .compute_velocity(&input.movement, &state.velocity, &mover.tuning, dt);

    // 2) Orientation (yaw only).
    let yaw_input = if input.look.x.is_finite() { input.look.x } else { 0.0 };
    state.rotation_rate = Vec3::new(0.0, yaw_input * mover.config.turn_speed, 0.0);
    if state.rotation_rate != Vec3::zeros() {
        // Rates are about local axes, so the increment is applied on the right.
        let increment = Quat::from_scaled_axis(state.rotation_rate * dt);
        state.pose.rotation = state.pose.rotation * increment;
        state.pose.rotation.renormalize_fast();
    }

    // 3) Tentative position.
    let mut tentative = state.pose;
    if state.velocity != Vec3::zeros() {
        let v = state.velocity;
        tentative.translation +=
            (tentative.right() * v.x + tentative.up() * v.y + tentative.forward() * v.z) * dt;
    }

    // 4) Depenetration.
    let mut report = StepReport::default();
    if let Some(volume) = &state.volume {
        let resolution = resolve(query, volume, &tentative, &mover.config.resolver);
        tentative.translation = resolution.translation;
        report.blocked = resolution.blocked;
        report.corrections = resolution.corrections;
        report.collided = true;
    }

    // 5) Velocity reset on contact.
    if mover.config.resolver.reset_speed_on_contact && !report.blocked.is_empty() {
        log::debug!("Contact blocked axes {:#05b}", report.blocked.bits);
        state.velocity = report.blocked.zero_blocked(&state.velocity);
    }

    // 6) Commit.
    state.pose = tentative;
    report.moved = (tentative.translation - start).norm();
    report
}

impl<M: MovementModel> Mover<M> {
    /// See [`step_movement`].
    pub fn step<Q: CollisionQuery>(&mut self, query: &Q, input: &TickInput, dt: f32) -> StepReport {
        step_movement(self, query, input, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    use crate::{
        bitmask_flags::Axis,
        collision::{ColliderShapeDef, MoverVolume, StaticWorld, WorldStaticDef},
        config::{FirstPersonTuning, MoverConfig, ResolverSettings},
        constants::DEFAULT_FIXED_DT,
        types::{Pose, Vec2},
        velocity::FirstPersonModel,
    };

    fn ground() -> StaticWorld {
        StaticWorld::build([WorldStaticDef::new(
            0,
            Vec3::zeros(),
            Quat::identity(),
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        )])
    }

    fn mover_at(y: f32, config: MoverConfig) -> Mover<FirstPersonModel> {
        Mover::new(
            FirstPersonModel,
            Pose::from_translation(Vec3::new(0.0, y, 0.0)),
            Some(MoverVolume::ball(0.5)),
            FirstPersonTuning::default(),
            config,
        )
        .unwrap()
    }

    #[test]
    fn forward_input_moves_along_facing() {
        let world = StaticWorld::empty();
        let mut mover = mover_at(5.0, MoverConfig::default());
        mover.set_pose(Pose::new(
            Vec3::new(0.0, 5.0, 0.0),
            Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2),
        ));

        let report = mover.step(&world, &TickInput::movement(Vec3::z()), DEFAULT_FIXED_DT);

        // Facing +X after a quarter turn.
        let expected = 40.0 * DEFAULT_FIXED_DT * DEFAULT_FIXED_DT;
        assert_relative_eq!(mover.pose().translation.x, expected, epsilon = 1.0e-6);
        assert_relative_eq!(mover.pose().translation.z, 0.0, epsilon = 1.0e-6);
        assert_relative_eq!(report.moved, expected, epsilon = 1.0e-6);
        assert!(report.collided);
        assert!(report.blocked.is_empty());
    }

    #[test]
    fn look_input_yaws_by_turn_speed() {
        let world = StaticWorld::empty();
        let config = MoverConfig {
            turn_speed: 2.0,
            ..MoverConfig::default()
        };
        let mut mover = mover_at(5.0, config);

        mover.step(
            &world,
            &TickInput::new(Vec3::zeros(), Vec2::new(1.0, 0.0)),
            0.5,
        );
        assert_relative_eq!(mover.state().rotation_rate.y, 2.0);
        assert_relative_eq!(mover.pose().rotation.angle(), 1.0, epsilon = 1.0e-6);
        // Rotation alone never moves the mover.
        assert_eq!(mover.pose().translation, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn long_turns_keep_the_rotation_unit_length() {
        let world = StaticWorld::empty();
        let mut mover = mover_at(5.0, MoverConfig::default());
        let turn = TickInput::new(Vec3::z(), Vec2::new(0.37, 0.0));

        for _ in 0..50_000 {
            mover.step(&world, &turn, DEFAULT_FIXED_DT);
        }

        let q = mover.pose().rotation;
        assert_relative_eq!(q.as_ref().norm(), 1.0, epsilon = 1.0e-5);
        assert_relative_eq!(mover.pose().forward().norm(), 1.0, epsilon = 1.0e-5);
    }

    #[test]
    fn falling_into_ground_zeroes_vertical_speed() {
        let world = ground();
        let mut mover = mover_at(0.55, MoverConfig::default());

        // Push down until the ground stops it.
        for _ in 0..20 {
            mover.step(&world, &TickInput::movement(-Vec3::y()), DEFAULT_FIXED_DT);
        }
        assert_relative_eq!(mover.pose().translation.y, 0.5, epsilon = 1.0e-4);

        let report = mover.step(&world, &TickInput::movement(-Vec3::y()), DEFAULT_FIXED_DT);
        assert!(report.blocked.has(Axis::Vertical));
        assert_eq!(mover.velocity().y, 0.0);
    }

    #[test]
    fn contact_keeps_velocity_when_reset_is_off() {
        let world = ground();
        let config = MoverConfig {
            resolver: ResolverSettings {
                reset_speed_on_contact: false,
                ..ResolverSettings::default()
            },
            ..MoverConfig::default()
        };
        let mut mover = mover_at(0.5, config);

        let report = mover.step(&world, &TickInput::movement(-Vec3::y()), DEFAULT_FIXED_DT);
        assert!(report.blocked.has(Axis::Vertical));
        assert!(mover.velocity().y < 0.0);
    }

    #[test]
    fn resolver_runs_at_rest() {
        let world = ground();
        // Spawned half inside the ground, no input.
        let mut mover = mover_at(0.25, MoverConfig::default());

        let report = mover.step(&world, &TickInput::default(), DEFAULT_FIXED_DT);
        assert!(report.collided);
        assert_relative_eq!(mover.pose().translation.y, 0.5, epsilon = 1.0e-5);
    }

    #[test]
    fn without_volume_the_mover_passes_through() {
        let world = ground();
        let mut mover = Mover::new(
            FirstPersonModel,
            Pose::from_translation(Vec3::new(0.0, 0.25, 0.0)),
            None,
            FirstPersonTuning::default(),
            MoverConfig::default(),
        )
        .unwrap();

        let report = mover.step(&world, &TickInput::default(), DEFAULT_FIXED_DT);
        assert!(!report.collided);
        assert_eq!(mover.pose().translation.y, 0.25);
    }
}
