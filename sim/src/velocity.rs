//! Velocity models: turn per-tick movement input into a local-frame velocity.

use crate::{
    config::{AxisTuning, FirstPersonTuning},
    error::Result,
    types::Vec3,
};

/// A movement model computes the next local velocity of a mover.
///
/// Implementations are pure: the same input, velocity, tuning and dt always yield the
/// same result. Input is taken as given; it is neither clamped nor normalized here.
pub trait MovementModel {
    type Tuning: Clone + std::fmt::Debug;

    fn compute_velocity(&self, input: &Vec3, current: &Vec3, tuning: &Self::Tuning, dt: f32)
    -> Vec3;

    /// Reject tuning this model cannot run with. Called once when a mover is created.
    fn validate_tuning(&self, _tuning: &Self::Tuning) -> Result<()> {
        Ok(())
    }
}

/// Free-flying first-person mover.
///
/// Axes (local frame)
/// - x: sideways, symmetric.
/// - y: vertical, symmetric.
/// - z: forward/backward, each direction with its own tuning.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstPersonModel;

impl MovementModel for FirstPersonModel {
    type Tuning = FirstPersonTuning;

    fn compute_velocity(
        &self,
        input: &Vec3,
        current: &Vec3,
        tuning: &FirstPersonTuning,
        dt: f32,
    ) -> Vec3 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        Vec3::new(
            symmetric_axis(sanitize(input.x), current.x, &tuning.sideways, dt),
            symmetric_axis(sanitize(input.y), current.y, &tuning.vertical, dt),
            asymmetric_axis(
                sanitize(input.z),
                current.z,
                &tuning.forward,
                &tuning.backward,
                dt,
            ),
        )
    }

    fn validate_tuning(&self, tuning: &FirstPersonTuning) -> Result<()> {
        tuning.validate()
    }
}

/// Non-finite input would poison the clamp bounds; treat it as no input.
#[inline]
fn sanitize(input: f32) -> f32 {
    if input.is_finite() { input } else { 0.0 }
}

/// -1, 0 or +1. Unlike `f32::signum`, zero maps to zero.
#[inline]
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Velocity change that brakes `v` toward zero without crossing it.
#[inline]
fn braking(v: f32, deceleration: f32, dt: f32) -> f32 {
    (-deceleration * sign(v) * dt).clamp(-v.abs(), v.abs())
}

/// Final velocity for one axis.
///
/// While input is held the caps scale with its magnitude, so half input tops out at half
/// speed. A velocity already beyond a reduced cap is pulled back onto it immediately.
#[inline]
fn capped(v: f32, change: f32, input: f32, max_negative: f32, max_positive: f32) -> f32 {
    let m = if input != 0.0 { input.abs() } else { 1.0 };
    (v + change).clamp(-max_negative * m, max_positive * m)
}

fn symmetric_axis(input: f32, v: f32, tuning: &AxisTuning, dt: f32) -> f32 {
    let change = if input != 0.0 {
        tuning.acceleration * input * dt
    } else {
        braking(v, tuning.deceleration, dt)
    };
    capped(v, change, input, tuning.max_speed, tuning.max_speed)
}

fn asymmetric_axis(
    input: f32,
    v: f32,
    forward: &AxisTuning,
    backward: &AxisTuning,
    dt: f32,
) -> f32 {
    let change = if input != 0.0 {
        let acceleration = if input > 0.0 {
            forward.acceleration
        } else {
            backward.acceleration
        };
        acceleration * input * dt
    } else {
        let deceleration = if v > 0.0 {
            forward.deceleration
        } else {
            backward.deceleration
        };
        braking(v, deceleration, dt)
    };
    capped(v, change, input, backward.max_speed, forward.max_speed)
}
