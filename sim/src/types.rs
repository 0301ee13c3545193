/*!
Core math aliases and the pose type shared by every simulation module.

Conventions
- Units are meters, seconds and radians.
- The mover's local frame is x = right (lateral), y = up (vertical), z = forward.
- All nalgebra types come through `rapier3d::na` so the collision backend and the
  simulation never disagree on the nalgebra version.
*/

use rapier3d::na;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Position, orientation and scale of an entity at one point in simulated time.
///
/// The same type serves as the authoritative simulation pose, as the interpolation
/// snapshots, and as the blended visual pose handed to rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    #[inline]
    pub fn identity() -> Self {
        Self::from_translation(Vec3::zeros())
    }

    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity())
    }

    /// Rigid part of the pose, for parry/rapier queries. Scale is not part of collision.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(na::Translation3::from(self.translation), self.rotation)
    }

    /// World-space direction of the local +X axis.
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::x()
    }

    /// World-space direction of the local +Y axis.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::y()
    }

    /// World-space direction of the local +Z axis.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::z()
    }

    /// Express a world-space direction in this pose's local frame.
    #[inline]
    pub fn to_local_direction(&self, world: &Vec3) -> Vec3 {
        self.rotation.inverse_transform_vector(world)
    }
}
