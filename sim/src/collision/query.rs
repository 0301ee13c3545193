use std::fmt;

use rapier3d::parry::shape::{SharedShape, ShapeType};

use crate::{
    error::Result,
    types::{Pose, Vec3},
};

/// Collision volume attached to a mover.
///
/// Shapes are centered on the mover's pose. Capsules are aligned with the local Y axis.
#[derive(Clone)]
pub struct MoverVolume {
    shape: SharedShape,
}

impl MoverVolume {
    pub fn capsule_y(half_height: f32, radius: f32) -> Self {
        Self::from_shape(SharedShape::capsule_y(half_height, radius))
    }

    pub fn ball(radius: f32) -> Self {
        Self::from_shape(SharedShape::ball(radius))
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::from_shape(SharedShape::cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
        ))
    }

    /// Any parry shape. Whether a backend supports it is decided at query time.
    pub fn from_shape(shape: SharedShape) -> Self {
        Self { shape }
    }

    #[inline]
    pub fn shape(&self) -> &SharedShape {
        &self.shape
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.shape.shape_type()
    }
}

impl fmt::Debug for MoverVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoverVolume")
            .field("shape_type", &self.shape_type())
            .finish()
    }
}

/// Minimum separating vector between a mover volume and one shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Penetration {
    /// World-space unit direction that moves the volume out of the shape.
    pub direction: Vec3,
    /// Distance along `direction` (meters). Zero when not penetrating.
    pub distance: f32,
    pub penetrated: bool,
}

impl Penetration {
    #[inline]
    pub fn none() -> Self {
        Self {
            direction: Vec3::zeros(),
            distance: 0.0,
            penetrated: false,
        }
    }

    /// `direction * distance`.
    #[inline]
    pub fn separation(&self) -> Vec3 {
        self.direction * self.distance
    }
}

/// Collision backend consumed by the depenetration resolver.
///
/// Implementations answer two questions about a volume at a pose: which blocking shapes
/// overlap it, and how to get out of one of them. Trigger shapes never appear in
/// `query_overlap` results.
pub trait CollisionQuery {
    /// Opaque reference to a shape owned by the backend.
    type Shape: Copy + fmt::Debug;

    /// Non-trigger shapes overlapping `volume` placed at `pose`.
    ///
    /// Returns `SimError::UnsupportedVolume` when the backend cannot query this volume type.
    fn query_overlap(&self, volume: &MoverVolume, pose: &Pose) -> Result<Vec<Self::Shape>>;

    /// Separating vector that moves `volume` at `pose` out of `shape`.
    fn query_penetration(
        &self,
        volume: &MoverVolume,
        pose: &Pose,
        shape: Self::Shape,
    ) -> Result<Penetration>;
}
