use super::query::{CollisionQuery, MoverVolume};
use crate::{
    bitmask_flags::BlockedAxes,
    config::ResolverSettings,
    constants::BLOCKED_AXIS_EPS,
    error::SimError,
    types::{Pose, Vec3},
};

/// Outcome of resolving one tentative pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Corrected world-space translation. Rotation is never changed by the resolver.
    pub translation: Vec3,
    /// Local axes along which a shape pushed the volume back.
    pub blocked: BlockedAxes,
    /// Number of non-zero corrections applied.
    pub corrections: u32,
}

impl Resolution {
    fn unconstrained(pose: &Pose) -> Self {
        Self {
            translation: pose.translation,
            blocked: BlockedAxes::default(),
            corrections: 0,
        }
    }
}

/// Push `volume` at `tentative` out of every blocking shape it overlaps.
///
/// Algorithm
/// - Up to `settings.max_iterations` passes; a pass that finds no overlap ends the loop.
/// - Each overlapping shape is resolved in turn against the already-corrected position.
/// - Correction components smaller than `settings.snap_epsilon` are dropped.
/// - A penetrating contact blocks every local axis its separation direction leans on.
///
/// Wedged configurations can leave residual overlap after the last pass; that is accepted.
/// An unsupported volume yields an unconstrained move. A failed penetration query skips
/// that shape for the current pass.
pub fn resolve<Q: CollisionQuery>(
    query: &Q,
    volume: &MoverVolume,
    tentative: &Pose,
    settings: &ResolverSettings,
) -> Resolution {
    let mut pose = *tentative;
    let mut blocked = BlockedAxes::default();
    let mut corrections = 0;

    for iteration in 0..settings.max_iterations {
        let shapes = match query.query_overlap(volume, &pose) {
            Ok(shapes) => shapes,
            Err(SimError::UnsupportedVolume(_)) => return Resolution::unconstrained(tentative),
            Err(err) => {
                log::debug!("Overlap query failed, keeping position: {err}");
                break;
            }
        };
        if shapes.is_empty() {
            break;
        }

        log::trace!("Depenetration pass {iteration}: {} overlaps", shapes.len());

        for shape in shapes {
            let Ok(penetration) = query.query_penetration(volume, &pose, shape) else {
                continue;
            };
            if !penetration.penetrated {
                continue;
            }

            let correction = snap_near_zero(penetration.separation(), settings.snap_epsilon);
            if correction != Vec3::zeros() {
                pose.translation += correction;
                corrections += 1;
            }

            let local = pose.to_local_direction(&penetration.direction);
            blocked = blocked.union(BlockedAxes::from_local_direction(&local, BLOCKED_AXIS_EPS));
        }
    }

    Resolution {
        translation: pose.translation,
        blocked,
        corrections,
    }
}

/// Zero every component whose magnitude is below `epsilon`.
#[inline]
pub fn snap_near_zero(v: Vec3, epsilon: f32) -> Vec3 {
    v.map(|c| if c.abs() < epsilon { 0.0 } else { c })
}
