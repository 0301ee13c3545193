use crate::{
    collision::MoverVolume,
    config::MoverConfig,
    error::{Result, SimError},
    types::{Pose, Vec2, Vec3},
    velocity::MovementModel,
};

/// Input for one mover for one fixed tick.
///
/// - `movement`: desired local direction (x = right, y = up, z = forward), usually in `[-1, 1]`.
/// - `look`: x turns about the local up axis (positive turns right), y is reserved for pitch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    pub movement: Vec3,
    pub look: Vec2,
}

impl TickInput {
    pub fn new(movement: Vec3, look: Vec2) -> Self {
        Self { movement, look }
    }

    pub fn movement(movement: Vec3) -> Self {
        Self {
            movement,
            look: Vec2::zeros(),
        }
    }
}

/// Mutable per-tick state of a mover.
#[derive(Clone, Debug)]
pub struct MoverState {
    /// Local-frame velocity (m/s).
    pub velocity: Vec3,
    /// Angular rate about the local axes (rad/s).
    pub rotation_rate: Vec3,
    /// Authoritative pose, committed once per fixed tick.
    pub pose: Pose,
    /// `None` disables depenetration for this mover.
    pub volume: Option<MoverVolume>,
}

/// A simulated character: movement model, its tuning and the live state.
///
/// Tuning and config are fixed at creation.
#[derive(Clone, Debug)]
pub struct Mover<M: MovementModel> {
    pub(crate) model: M,
    pub(crate) tuning: M::Tuning,
    pub(crate) config: MoverConfig,
    pub(crate) state: MoverState,
}

impl<M: MovementModel> Mover<M> {
    /// Create a mover at rest at `pose`.
    ///
    /// Invalid tuning or config rejects the mover. A missing volume is logged once and the
    /// mover runs without collision.
    pub fn new(
        model: M,
        pose: Pose,
        volume: Option<MoverVolume>,
        tuning: M::Tuning,
        config: MoverConfig,
    ) -> Result<Self> {
        config.validate()?;
        model.validate_tuning(&tuning)?;

        if volume.is_none() {
            log::error!("{}", SimError::MissingVolume);
        }

        Ok(Self {
            model,
            tuning,
            config,
            state: MoverState {
                velocity: Vec3::zeros(),
                rotation_rate: Vec3::zeros(),
                pose,
                volume,
            },
        })
    }

    #[inline]
    pub fn state(&self) -> &MoverState {
        &self.state
    }

    #[inline]
    pub fn pose(&self) -> &Pose {
        &self.state.pose
    }

    #[inline]
    pub fn velocity(&self) -> &Vec3 {
        &self.state.velocity
    }

    #[inline]
    pub fn config(&self) -> &MoverConfig {
        &self.config
    }

    #[inline]
    pub fn tuning(&self) -> &M::Tuning {
        &self.tuning
    }

    #[inline]
    pub fn collision_enabled(&self) -> bool {
        self.state.volume.is_some()
    }

    /// Teleport. Velocity is kept; the next tick resolves from the new pose.
    pub fn set_pose(&mut self, pose: Pose) {
        self.state.pose = pose;
    }
}
