//! Static collision world built from immutable collider definitions.
//!
//! Conventions
//! - Units are meters.
//! - Rotation is a unit quaternion.
//! - Definitions are inserted sorted by `id`, so the same input always builds the same set.
//! - Statics never move after construction.

use rapier3d::{na::Translation3, prelude::*};
use serde::{Deserialize, Serialize};

use super::{
    narrow_phase::{compute_penetration, is_supported_volume},
    query::{CollisionQuery, MoverVolume, Penetration},
};
use crate::{
    error::{Result, SimError},
    types::{Pose, Quat, Vec3},
};

/// Canonical definition of an immutable world collider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldStaticDef {
    /// Stable unique identifier used for deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation.
    pub rotation: Quat,
    pub shape: ColliderShapeDef,
    /// Trigger volumes detect overlap but never block a mover.
    #[serde(default)]
    pub trigger: bool,
}

impl WorldStaticDef {
    pub fn new(id: u32, translation: Vec3, rotation: Quat, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation,
            shape,
            trigger: false,
        }
    }

    pub fn as_trigger(mut self) -> Self {
        self.trigger = true;
        self
    }
}

/// Supported static collider shapes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space).
    ///
    /// The normal is `rotation * +Y`; the surface sits `offset_along_normal` meters from the
    /// translation along that normal. Everything below the surface is solid.
    Plane { offset_along_normal: f32 },

    /// Oriented cuboid with given half-extents.
    Cuboid { half_extents: Vec3 },

    Sphere { radius: f32 },

    /// Y-aligned capsule.
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder.
    CylinderY { radius: f32, half_height: f32 },

    /// Y-aligned cone.
    ConeY { radius: f32, half_height: f32 },

    /// Cuboid with all edges and corners rounded by `border_radius`.
    RoundCuboid {
        half_extents: Vec3,
        border_radius: f32,
    },
}

/// Build a positioned collider from a `WorldStaticDef`.
pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let mut translation = def.translation;

    let builder = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // Local +Y half-space; the pose rotation orients it, the offset slides it.
            let normal = def.rotation * Vector::y();
            translation += normal * *offset_along_normal;
            ColliderBuilder::halfspace(Vector::y_axis())
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),

        ColliderShapeDef::ConeY {
            radius,
            half_height,
        } => ColliderBuilder::cone(*half_height, *radius),

        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
            *border_radius,
        ),
    };

    let mut collider = builder.sensor(def.trigger).build();
    collider.set_position(Isometry::from_parts(
        Translation3::from(translation),
        def.rotation,
    ));
    collider
}

/// Static colliders plus the broad phase that answers mover queries.
pub struct StaticWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl StaticWorld {
    /// Build the world from static definitions, inserted in `id` order.
    pub fn build(defs: impl IntoIterator<Item = WorldStaticDef>) -> Self {
        let mut defs: Vec<WorldStaticDef> = defs.into_iter().collect();
        defs.sort_by_key(|d| d.id);

        let bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let handles: Vec<ColliderHandle> = defs
            .iter()
            .map(|def| colliders.insert(collider_from_def(def)))
            .collect();

        // Statics never move, so one broad-phase update covers the world's lifetime.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut events = Vec::new();
        broad_phase.update(
            &IntegrationParameters::default(),
            &colliders,
            &bodies,
            &handles,
            &[],
            &mut events,
        );

        log::debug!(
            "Built static world: {} colliders ({} triggers)",
            colliders.len(),
            defs.iter().filter(|d| d.trigger).count()
        );

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase: NarrowPhase::new(),
        }
    }

    pub fn empty() -> Self {
        Self::build([])
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// All colliders, triggers included.
    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    /// Trigger colliders overlapping `volume` at `pose`.
    pub fn query_triggers(&self, volume: &MoverVolume, pose: &Pose) -> Result<Vec<ColliderHandle>> {
        self.overlapping(volume, pose, QueryFilter::default().exclude_solids())
    }

    fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    fn overlapping(
        &self,
        volume: &MoverVolume,
        pose: &Pose,
        filter: QueryFilter<'_>,
    ) -> Result<Vec<ColliderHandle>> {
        if !is_supported_volume(volume.shape_type()) {
            return Err(SimError::UnsupportedVolume(volume.shape_type()));
        }

        // Pairs the dispatcher cannot test are simply not reported.
        let pipeline = self.query_pipeline(filter);
        let mut hits: Vec<ColliderHandle> = pipeline
            .intersect_shape(pose.iso(), volume.shape().as_ref())
            .map(|(handle, _)| handle)
            .collect();
        // BVH leaf order is not insertion order.
        hits.sort_by_key(|h| h.into_raw_parts());
        Ok(hits)
    }
}

impl CollisionQuery for StaticWorld {
    type Shape = ColliderHandle;

    fn query_overlap(&self, volume: &MoverVolume, pose: &Pose) -> Result<Vec<ColliderHandle>> {
        self.overlapping(volume, pose, QueryFilter::default().exclude_sensors())
    }

    fn query_penetration(
        &self,
        volume: &MoverVolume,
        pose: &Pose,
        shape: ColliderHandle,
    ) -> Result<Penetration> {
        let collider = self.colliders.get(shape).ok_or(SimError::ShapeNotFound)?;
        compute_penetration(
            &pose.iso(),
            volume.shape().as_ref(),
            collider.position(),
            collider.shape(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rapier3d::parry::shape::{ShapeType, SharedShape};
    use std::f32::consts::FRAC_PI_2;

    fn ground() -> WorldStaticDef {
        WorldStaticDef::new(
            0,
            Vec3::zeros(),
            Quat::identity(),
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        )
    }

    #[test]
    fn plane_offset_moves_surface_along_rotated_normal() {
        // Normal rotated from +Y onto -X; surface one meter further along it.
        let def = WorldStaticDef::new(
            1,
            Vec3::new(2.0, 0.0, 0.0),
            Quat::from_axis_angle(&Vector::z_axis(), FRAC_PI_2),
            ColliderShapeDef::Plane {
                offset_along_normal: 1.0,
            },
        );
        let world = StaticWorld::build([def]);
        let ball = MoverVolume::ball(0.5);

        // Surface at x = 1, solid for x > 1.
        let pose = Pose::from_translation(Vec3::new(0.8, 0.0, 0.0));
        let hits = world.query_overlap(&ball, &pose).unwrap();
        assert_eq!(hits.len(), 1);

        let p = world.query_penetration(&ball, &pose, hits[0]).unwrap();
        assert!(p.penetrated);
        assert_relative_eq!(p.direction, -Vec3::x(), epsilon = 1.0e-5);
        assert_relative_eq!(p.distance, 0.3, epsilon = 1.0e-5);

        assert!(world
            .query_overlap(&ball, &Pose::from_translation(Vec3::new(0.2, 0.0, 0.0)))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn overlap_query_only_reports_nearby_shapes() {
        // 10 x 10 grid of small spheres, 3 m apart.
        let defs = (0..100).map(|id| {
            let (x, z) = ((id % 10) as f32 * 3.0, (id / 10) as f32 * 3.0);
            WorldStaticDef::new(
                id,
                Vec3::new(x, 0.0, z),
                Quat::identity(),
                ColliderShapeDef::Sphere { radius: 0.5 },
            )
        });
        let world = StaticWorld::build(defs);
        let ball = MoverVolume::ball(1.2);

        // Between spheres 34 and 35, overlapping both.
        let pose = Pose::from_translation(Vec3::new(13.5, 0.0, 9.0));
        let hits = world.query_overlap(&ball, &pose).unwrap();
        let indices: Vec<u32> = hits.iter().map(|h| h.into_raw_parts().0).collect();
        assert_eq!(indices, vec![34, 35]);

        let far = Pose::from_translation(Vec3::new(1.5, 0.0, 1.5));
        assert!(world.query_overlap(&ball, &far).unwrap().is_empty());
    }

    #[test]
    fn triggers_never_block() {
        let trigger = WorldStaticDef::new(
            7,
            Vec3::new(0.0, 1.0, 0.0),
            Quat::identity(),
            ColliderShapeDef::Cuboid {
                half_extents: Vec3::new(2.0, 2.0, 2.0),
            },
        )
        .as_trigger();
        let world = StaticWorld::build([trigger, ground()]);
        let volume = MoverVolume::capsule_y(0.5, 0.3);
        let pose = Pose::from_translation(Vec3::new(0.0, 2.0, 0.0));

        assert!(world.query_overlap(&volume, &pose).unwrap().is_empty());
        assert_eq!(world.query_triggers(&volume, &pose).unwrap().len(), 1);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn unsupported_volume_is_reported() {
        let world = StaticWorld::build([ground()]);
        let volume = MoverVolume::from_shape(SharedShape::cylinder(0.5, 0.3));

        let err = world
            .query_overlap(&volume, &Pose::identity())
            .unwrap_err();
        assert_eq!(err, SimError::UnsupportedVolume(ShapeType::Cylinder));
    }

    #[test]
    fn stale_handle_is_shape_not_found() {
        let world = StaticWorld::empty();
        let err = world
            .query_penetration(
                &MoverVolume::ball(0.5),
                &Pose::identity(),
                ColliderHandle::invalid(),
            )
            .unwrap_err();
        assert_eq!(err, SimError::ShapeNotFound);
    }
}
