/*!
Collision root module.

The mover only needs two answers from the world: which blocking shapes overlap a volume,
and how far to push the volume out of one of them. The code is split for clarity:

- query:        the `CollisionQuery` backend trait, mover volumes and penetration results
- narrow_phase: separating vector from a parry3d contact query
- world:        static world definitions and the rapier-backed `StaticWorld` (BVH broad phase)
- depenetrate:  the iterative resolver that turns overlaps into a corrected translation
*/

pub mod depenetrate;
pub mod narrow_phase;
pub mod query;
pub mod world;

// Re-export commonly used types and functions.
pub use depenetrate::{Resolution, resolve};
pub use query::{CollisionQuery, MoverVolume, Penetration};
pub use world::{ColliderShapeDef, StaticWorld, WorldStaticDef, collider_from_def};
