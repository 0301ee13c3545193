//! Conversions between simulation and Bevy coordinates.
//!
//! The simulation's local frame is x = right, y = up, z = forward. Bevy looks down -Z, so
//! simulation space is Bevy space mirrored across the z = 0 plane. Mirroring a rotation keeps
//! the z component of the quaternion axis and negates x and y.

use bevy::prelude::*;
use sim::rapier3d::na::{Quaternion, UnitQuaternion};

#[inline]
pub fn to_bevy_translation(v: &sim::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, -v.z)
}

#[inline]
pub fn to_sim_translation(v: Vec3) -> sim::Vec3 {
    sim::Vec3::new(v.x, v.y, -v.z)
}

#[inline]
pub fn to_bevy_rotation(q: &sim::Quat) -> Quat {
    Quat::from_xyzw(-q.i, -q.j, q.k, q.w)
}

#[inline]
pub fn to_sim_rotation(q: Quat) -> sim::Quat {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, -q.x, -q.y, q.z))
}

/// Render transform for a simulation pose.
pub fn to_bevy_transform(pose: &sim::Pose) -> Transform {
    Transform {
        translation: to_bevy_translation(&pose.translation),
        rotation: to_bevy_rotation(&pose.rotation),
        scale: Vec3::new(pose.scale.x, pose.scale.y, pose.scale.z),
    }
}

pub fn to_sim_pose(transform: &Transform) -> sim::Pose {
    sim::Pose {
        translation: to_sim_translation(transform.translation),
        rotation: to_sim_rotation(transform.rotation),
        scale: sim::Vec3::new(transform.scale.x, transform.scale.y, transform.scale.z),
    }
}
