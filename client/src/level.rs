//! Static test level: collision world plus matching render meshes.
//!
//! Definitions are authored in simulation coordinates and mirrored for rendering.

use std::f32::consts::FRAC_PI_4;

use bevy::prelude::*;
use sim::{ColliderShapeDef, StaticWorld, WorldStaticDef};

use crate::convert::{to_bevy_rotation, to_bevy_translation};

/// Collision geometry every mover is resolved against.
#[derive(Resource)]
pub struct CollisionWorld(pub StaticWorld);

const ROOM_HALF_SIZE: f32 = 12.0;
const WALL_HEIGHT: f32 = 1.5;
const WALL_THICKNESS: f32 = 0.5;

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(CollisionWorld(StaticWorld::build(level_defs())));
    app.add_systems(Startup, spawn_level);
}

fn level_defs() -> Vec<WorldStaticDef> {
    let wall = |id, translation: sim::Vec3, half_extents: sim::Vec3| {
        WorldStaticDef::new(
            id,
            translation,
            sim::Quat::identity(),
            ColliderShapeDef::Cuboid { half_extents },
        )
    };
    let along_x = sim::Vec3::new(ROOM_HALF_SIZE, WALL_HEIGHT, WALL_THICKNESS);
    let along_z = sim::Vec3::new(WALL_THICKNESS, WALL_HEIGHT, ROOM_HALF_SIZE);
    let edge = ROOM_HALF_SIZE + WALL_THICKNESS;

    vec![
        WorldStaticDef::new(
            0,
            sim::Vec3::zeros(),
            sim::Quat::identity(),
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        ),
        wall(1, sim::Vec3::new(0.0, WALL_HEIGHT, edge), along_x),
        wall(2, sim::Vec3::new(0.0, WALL_HEIGHT, -edge), along_x),
        wall(3, sim::Vec3::new(edge, WALL_HEIGHT, 0.0), along_z),
        wall(4, sim::Vec3::new(-edge, WALL_HEIGHT, 0.0), along_z),
        // Pillar.
        WorldStaticDef::new(
            5,
            sim::Vec3::new(4.0, WALL_HEIGHT, 4.0),
            sim::Quat::identity(),
            ColliderShapeDef::CylinderY {
                radius: 1.0,
                half_height: WALL_HEIGHT,
            },
        ),
        // Crate turned 45 degrees, for pushing along a diagonal face.
        WorldStaticDef::new(
            6,
            sim::Vec3::new(-5.0, 0.75, 5.0),
            sim::Quat::from_axis_angle(&sim::Vec3::y_axis(), FRAC_PI_4),
            ColliderShapeDef::RoundCuboid {
                half_extents: sim::Vec3::new(0.65, 0.65, 0.65),
                border_radius: 0.1,
            },
        ),
        // Ramp: a tilted slab the mover gets pushed up onto.
        WorldStaticDef::new(
            7,
            sim::Vec3::new(-5.0, 0.4, -4.0),
            sim::Quat::from_axis_angle(&sim::Vec3::x_axis(), 0.25),
            ColliderShapeDef::Cuboid {
                half_extents: sim::Vec3::new(2.0, 0.2, 4.0),
            },
        ),
        WorldStaticDef::new(
            8,
            sim::Vec3::new(0.0, 1.0, 8.0),
            sim::Quat::identity(),
            ColliderShapeDef::Sphere { radius: 1.0 },
        )
        .as_trigger(),
    ]
}

fn spawn_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let solid = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.55, 0.6),
        perceptual_roughness: 0.9,
        ..default()
    });
    let trigger = materials.add(StandardMaterial {
        base_color: Color::srgba(0.2, 0.8, 0.3, 0.35),
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    for def in level_defs() {
        let mesh = mesh_for(&def.shape);
        let mut translation = def.translation;
        if let ColliderShapeDef::Plane {
            offset_along_normal,
        } = def.shape
        {
            translation += def.rotation * sim::Vec3::y() * offset_along_normal;
        }

        commands.spawn((
            Name::new(format!("Static {}", def.id)),
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(if def.trigger {
                trigger.clone()
            } else {
                solid.clone()
            }),
            Transform {
                translation: to_bevy_translation(&translation),
                rotation: to_bevy_rotation(&def.rotation),
                ..default()
            },
        ));
    }

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn mesh_for(shape: &ColliderShapeDef) -> Mesh {
    match *shape {
        ColliderShapeDef::Plane { .. } => Plane3d::default()
            .mesh()
            .size(4.0 * ROOM_HALF_SIZE, 4.0 * ROOM_HALF_SIZE)
            .into(),
        ColliderShapeDef::Cuboid { half_extents } => {
            Cuboid::new(2.0 * half_extents.x, 2.0 * half_extents.y, 2.0 * half_extents.z).into()
        }
        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => {
            let full = 2.0 * (half_extents.add_scalar(border_radius));
            Cuboid::new(full.x, full.y, full.z).into()
        }
        ColliderShapeDef::Sphere { radius } => Sphere::new(radius).into(),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => Capsule3d::new(radius, 2.0 * half_height).into(),
        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => Cylinder::new(radius, 2.0 * half_height).into(),
        ColliderShapeDef::ConeY {
            radius,
            half_height,
        } => Cone {
            radius,
            height: 2.0 * half_height,
        }
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim::CollisionQuery;

    #[test]
    fn level_ids_are_unique() {
        let defs = level_defs();
        let mut ids: Vec<u32> = defs.iter().map(|d| d.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), defs.len());
    }

    #[test]
    fn player_spawn_is_clear_of_the_level() {
        let world = StaticWorld::build(level_defs());
        let volume = crate::player::player_volume();
        let pose = crate::player::spawn_pose();

        assert!(world.query_overlap(&volume, &pose).unwrap().is_empty());
    }
}
