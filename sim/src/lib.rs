pub mod bitmask_flags;
pub mod clock;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod interpolation;
pub mod mover;
pub mod simulation;
pub mod step;
pub mod types;
pub mod velocity;

// Re-export Rapier so hosts can build shapes without depending on `rapier3d` directly.
pub use rapier3d;

pub use bitmask_flags::{Axis, BlockedAxes};
pub use clock::{ClockSlot, SimulationClock};
pub use collision::{
    ColliderShapeDef, CollisionQuery, MoverVolume, Penetration, Resolution, StaticWorld,
    WorldStaticDef, resolve,
};
pub use config::{AxisTuning, FirstPersonTuning, MoverConfig, ResolverSettings};
pub use constants::{
    BLOCKED_AXIS_EPS, CLOCK_OFFSET, DEFAULT_FIXED_DT, DEFAULT_MAX_ITERATIONS,
    DEFAULT_SNAP_EPSILON, DEFAULT_TURN_SPEED,
};
pub use error::{Result, SimError};
pub use interpolation::{InterpolationTimeline, PoseHistory, RenderInterpolator};
pub use mover::{Mover, MoverState, TickInput};
pub use simulation::{EntityId, Simulation};
pub use step::{StepReport, step_movement};
pub use types::{Iso, Pose, Quat, Vec2, Vec3};
pub use velocity::{FirstPersonModel, MovementModel};
