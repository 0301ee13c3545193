//! Per-mover configuration.
//!
//! Everything here is set once when a mover is spawned and never mutated afterwards.
//! The structs (de)serialize with serde so hosts can keep tuning in data files.

use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_MAX_ITERATIONS, DEFAULT_SNAP_EPSILON, DEFAULT_TURN_SPEED},
    error::{Result, SimError},
};

/// Speed, acceleration and deceleration for one axis or one direction of an axis.
///
/// - `max_speed` is in meters per second.
/// - `acceleration` and `deceleration` are in meters per second squared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTuning {
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
}

impl AxisTuning {
    pub const fn new(max_speed: f32, acceleration: f32, deceleration: f32) -> Self {
        Self {
            max_speed,
            acceleration,
            deceleration,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        let fields = [
            ("max_speed", self.max_speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{name}.{field} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Tuning set for a first-person mover.
///
/// `sideways` and `vertical` are symmetric axes. `forward` and `backward` together drive
/// the local z axis, each used for its own sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirstPersonTuning {
    pub forward: AxisTuning,
    pub backward: AxisTuning,
    pub sideways: AxisTuning,
    pub vertical: AxisTuning,
}

impl Default for FirstPersonTuning {
    fn default() -> Self {
        Self {
            forward: AxisTuning::new(6.0, 40.0, 40.0),
            backward: AxisTuning::new(4.0, 30.0, 40.0),
            sideways: AxisTuning::new(5.0, 35.0, 40.0),
            vertical: AxisTuning::new(4.0, 30.0, 40.0),
        }
    }
}

impl FirstPersonTuning {
    pub fn validate(&self) -> Result<()> {
        self.forward.validate("forward")?;
        self.backward.validate("backward")?;
        self.sideways.validate("sideways")?;
        self.vertical.validate("vertical")
    }
}

/// Depenetration settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Upper bound on overlap passes per tick.
    pub max_iterations: u8,
    /// Zero local velocity components on axes that hit a surface.
    pub reset_speed_on_contact: bool,
    /// Per-axis correction magnitude that is dropped instead of applied (meters).
    pub snap_epsilon: f32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            reset_speed_on_contact: true,
            snap_epsilon: DEFAULT_SNAP_EPSILON,
        }
    }
}

impl ResolverSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.snap_epsilon.is_finite() || self.snap_epsilon < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "snap_epsilon must be finite and non-negative, got {}",
                self.snap_epsilon
            )));
        }
        Ok(())
    }
}

/// Everything a mover needs besides its model tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverConfig {
    pub resolver: ResolverSettings,
    /// Yaw rate produced by a full horizontal look input (radians per second).
    pub turn_speed: f32,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverSettings::default(),
            turn_speed: DEFAULT_TURN_SPEED,
        }
    }
}

impl MoverConfig {
    pub fn validate(&self) -> Result<()> {
        self.resolver.validate()?;
        if !self.turn_speed.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "turn_speed must be finite, got {}",
                self.turn_speed
            )));
        }
        Ok(())
    }
}
