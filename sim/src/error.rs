//! Error types for the simulation.

use rapier3d::parry::shape::ShapeType;
use thiserror::Error;

use crate::simulation::EntityId;

/// Simulation errors.
///
/// None of these cross a tick boundary: `Simulation::fixed_tick` and
/// `Simulation::render_frame` log and continue instead of returning them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A mover was created without a collision volume.
    #[error("Mover has no collision volume; depenetration is disabled for it")]
    MissingVolume,

    /// A second clock was offered to a slot that already owns one.
    #[error("A simulation clock is already installed; the duplicate was discarded")]
    DuplicateClock,

    /// The collision backend cannot run overlap queries for this volume type.
    #[error("Collision queries are not supported for volume type {0:?}")]
    UnsupportedVolume(ShapeType),

    /// The narrow phase has no penetration algorithm for this shape pair.
    #[error("No penetration query between {0:?} and {1:?}")]
    UnsupportedPair(ShapeType, ShapeType),

    /// A shape reference that no longer resolves to a collider.
    #[error("Static shape not found")]
    ShapeNotFound,

    /// Invalid tuning or resolver configuration.
    #[error("Invalid mover configuration: {0}")]
    InvalidConfig(String),

    /// Entity id not owned by this simulation.
    #[error("Unknown entity: {0:?}")]
    UnknownEntity(EntityId),
}

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
