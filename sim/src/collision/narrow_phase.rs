use rapier3d::parry::{
    query,
    shape::{Shape, ShapeType},
};

use super::query::Penetration;
use crate::{
    error::{Result, SimError},
    types::{Iso, Vec3},
};

/// Minimum translation that moves `shape1` out of `shape2`.
///
/// `direction` is a world-space unit vector pointing away from `shape2`. When the shapes are
/// separated or just touching, the result has `penetrated = false` and zero distance.
///
/// The static shape goes first in the contact query. Half-spaces only report a correct
/// depth and normal in that position.
pub fn compute_penetration(
    iso1: &Iso,
    shape1: &dyn Shape,
    iso2: &Iso,
    shape2: &dyn Shape,
) -> Result<Penetration> {
    let contact = query::contact(iso2, shape2, iso1, shape1, 0.0)
        .map_err(|_| unsupported(shape1, shape2))?;

    match contact {
        Some(c) if c.dist < 0.0 => {
            // normal1 is the static shape's outward normal, toward the mover.
            let direction: Vec3 = c.normal1.into_inner();
            Ok(Penetration {
                direction,
                distance: -c.dist,
                penetrated: true,
            })
        }
        _ => Ok(Penetration::none()),
    }
}

fn unsupported(shape1: &dyn Shape, shape2: &dyn Shape) -> SimError {
    SimError::UnsupportedPair(shape1.shape_type(), shape2.shape_type())
}

/// Volume types the overlap query can handle for a mover.
#[inline]
pub fn is_supported_volume(shape_type: ShapeType) -> bool {
    matches!(
        shape_type,
        ShapeType::Capsule | ShapeType::Ball | ShapeType::Cuboid
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rapier3d::{
        na::{self, Unit},
        parry::shape::{Ball, Capsule, Cuboid, HalfSpace},
    };

    fn at(x: f32, y: f32, z: f32) -> Iso {
        Iso::translation(x, y, z)
    }

    #[test]
    fn ball_sunk_into_ground_is_pushed_up() {
        let ground = HalfSpace::new(Unit::new_normalize(Vec3::y()));
        let ball = Ball::new(0.5);

        let p = compute_penetration(&at(0.0, 0.4, 0.0), &ball, &Iso::identity(), &ground).unwrap();
        assert!(p.penetrated);
        assert_relative_eq!(p.direction, Vec3::y(), epsilon = 1.0e-6);
        assert_relative_eq!(p.distance, 0.1, epsilon = 1.0e-6);
    }

    #[test]
    fn separated_shapes_report_no_penetration() {
        let a = Cuboid::new(Vec3::new(0.5, 0.5, 0.5));
        let b = Ball::new(0.5);

        let p = compute_penetration(&at(0.0, 0.0, 0.0), &a, &at(3.0, 0.0, 0.0), &b).unwrap();
        assert!(!p.penetrated);
        assert_eq!(p.distance, 0.0);
    }

    #[test]
    fn rotated_plane_pushes_along_its_normal() {
        // Wall surface at z = 2, normal turned from +Y onto -Z.
        let wall = HalfSpace::new(Unit::new_normalize(Vec3::y()));
        let wall_iso = Iso::from_parts(
            na::Translation3::new(0.0, 0.0, 2.0),
            na::UnitQuaternion::from_axis_angle(&Vec3::x_axis(), -std::f32::consts::FRAC_PI_2),
        );
        let ball = Ball::new(0.5);

        let p = compute_penetration(&at(0.0, 0.0, 1.75), &ball, &wall_iso, &wall).unwrap();
        assert!(p.penetrated);
        assert_relative_eq!(p.direction, -Vec3::z(), epsilon = 1.0e-5);
        assert_relative_eq!(p.distance, 0.25, epsilon = 1.0e-5);

        let clear = compute_penetration(&at(0.0, 0.0, 1.0), &ball, &wall_iso, &wall).unwrap();
        assert!(!clear.penetrated);
    }

    #[test]
    fn capsule_overlapping_box_is_pushed_out() {
        let capsule = Capsule::new_y(0.5, 0.3);
        let wall = Cuboid::new(Vec3::new(0.5, 2.0, 2.0));
        let capsule_iso = at(0.7, 0.0, 0.0);
        let wall_iso = Iso::from_parts(
            na::Translation3::new(0.0, 0.0, 0.0),
            na::UnitQuaternion::identity(),
        );

        let p = compute_penetration(&capsule_iso, &capsule, &wall_iso, &wall).unwrap();
        assert!(p.penetrated);
        assert_relative_eq!(p.direction, Vec3::x(), epsilon = 1.0e-3);
        assert_relative_eq!(p.distance, 0.1, epsilon = 1.0e-3);
    }

    #[test]
    fn only_capsule_ball_and_cuboid_volumes_are_supported() {
        assert!(is_supported_volume(ShapeType::Capsule));
        assert!(is_supported_volume(ShapeType::Ball));
        assert!(is_supported_volume(ShapeType::Cuboid));
        assert!(!is_supported_volume(ShapeType::Cylinder));
        assert!(!is_supported_volume(ShapeType::HalfSpace));
    }
}
