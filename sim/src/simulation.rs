/*!
Single-threaded simulation facade.

`Simulation` owns the collision world, the clock, the interpolation timeline and every
mover, and encodes the two update orders:

- Fixed tick: advance the fixed clock, record the tick on the timeline, step every mover,
  then rotate every mover's pose snapshots.
- Render frame: advance the render clock, recompute the interpolation factor, then blend
  every mover's visual pose.

Neither entry point fails. Per-entity problems are logged and the tick continues.
*/

use std::collections::BTreeMap;

use crate::{
    clock::SimulationClock,
    collision::{CollisionQuery, MoverVolume},
    config::MoverConfig,
    error::{Result, SimError},
    interpolation::{InterpolationTimeline, RenderInterpolator},
    mover::{Mover, TickInput},
    step::StepReport,
    types::{Pose, Vec3},
    velocity::MovementModel,
};

/// Handle to a mover owned by a `Simulation`. Ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl EntityId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

struct Entity<M: MovementModel> {
    mover: Mover<M>,
    input: TickInput,
    interpolator: RenderInterpolator,
    visual: Pose,
    last_report: StepReport,
}

pub struct Simulation<Q: CollisionQuery, M: MovementModel> {
    world: Q,
    model: M,
    clock: SimulationClock,
    timeline: InterpolationTimeline,
    // Ordered so every tick visits movers in spawn order.
    entities: BTreeMap<EntityId, Entity<M>>,
    next_id: u32,
}

impl<Q, M> Simulation<Q, M>
where
    Q: CollisionQuery,
    M: MovementModel + Clone + Default,
{
    pub fn new(world: Q, clock: SimulationClock) -> Self {
        Self {
            world,
            model: M::default(),
            timeline: InterpolationTimeline::new(&clock),
            clock,
            entities: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Offer a replacement clock. The simulation already owns one, so this is always rejected.
    pub fn install_clock(&mut self, _clock: SimulationClock) -> Result<()> {
        log::error!("A simulation clock is already installed; discarding the duplicate");
        Err(SimError::DuplicateClock)
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn timeline(&self) -> &InterpolationTimeline {
        &self.timeline
    }

    pub fn world(&self) -> &Q {
        &self.world
    }

    /// Add a mover at rest. Its interpolation snapshots both start at `pose`.
    pub fn spawn(
        &mut self,
        pose: Pose,
        volume: Option<MoverVolume>,
        tuning: M::Tuning,
        config: MoverConfig,
    ) -> Result<EntityId> {
        let mover = Mover::new(self.model.clone(), pose, volume, tuning, config)?;

        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            id,
            Entity {
                mover,
                input: TickInput::default(),
                interpolator: RenderInterpolator::new(pose),
                visual: pose,
                last_report: StepReport::default(),
            },
        );
        log::debug!("Spawned mover {id:?} at {:?}", pose.translation);
        Ok(id)
    }

    pub fn despawn(&mut self, id: EntityId) -> Result<()> {
        self.entities
            .remove(&id)
            .map(|_| ())
            .ok_or(SimError::UnknownEntity(id))
    }

    /// Input used by every following fixed tick until replaced.
    pub fn set_input(&mut self, id: EntityId, input: TickInput) -> Result<()> {
        self.entity_mut(id)?.input = input;
        Ok(())
    }

    /// Run one fixed tick of `dt` seconds.
    pub fn fixed_tick(&mut self, dt: f32) {
        self.clock.advance_fixed(f64::from(dt));
        self.timeline.on_fixed_tick(&self.clock);

        for entity in self.entities.values_mut() {
            entity.last_report = entity.mover.step(&self.world, &entity.input, dt);
        }

        for entity in self.entities.values_mut() {
            entity.interpolator.on_fixed_tick(*entity.mover.pose());
        }
    }

    /// Run one render frame `delta` seconds after the previous one. Returns the
    /// interpolation factor used for every visual pose.
    pub fn render_frame(&mut self, delta: f64) -> f32 {
        self.clock.advance_render(delta);
        let factor = self.timeline.on_render_frame(&self.clock);

        for entity in self.entities.values_mut() {
            entity.visual = entity
                .interpolator
                .visual_pose(factor, entity.mover.pose());
        }
        factor
    }

    pub fn authoritative_pose(&self, id: EntityId) -> Result<Pose> {
        Ok(*self.entity(id)?.mover.pose())
    }

    /// Pose blended by the latest `render_frame`.
    pub fn visual_pose(&self, id: EntityId) -> Result<Pose> {
        Ok(self.entity(id)?.visual)
    }

    pub fn velocity(&self, id: EntityId) -> Result<Vec3> {
        Ok(*self.entity(id)?.mover.velocity())
    }

    pub fn last_report(&self, id: EntityId) -> Result<StepReport> {
        Ok(self.entity(id)?.last_report)
    }

    pub fn mover(&self, id: EntityId) -> Result<&Mover<M>> {
        Ok(&self.entity(id)?.mover)
    }

    /// Turn render interpolation on or off for one mover.
    ///
    /// While off, the visual pose is the authoritative pose. Turning it back on restarts the
    /// snapshots from the authoritative pose.
    pub fn set_interpolation_enabled(&mut self, id: EntityId, enabled: bool) -> Result<()> {
        let entity = self.entity_mut(id)?;
        let live = *entity.mover.pose();
        entity.interpolator.set_enabled(enabled, live);
        if !enabled {
            entity.visual = live;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    fn entity(&self, id: EntityId) -> Result<&Entity<M>> {
        self.entities.get(&id).ok_or(SimError::UnknownEntity(id))
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity<M>> {
        self.entities.get_mut(&id).ok_or(SimError::UnknownEntity(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::{
        collision::StaticWorld, config::FirstPersonTuning, constants::DEFAULT_FIXED_DT,
        velocity::FirstPersonModel,
    };

    type Sim = Simulation<StaticWorld, FirstPersonModel>;

    fn sim_with_mover() -> (Sim, EntityId) {
        let mut sim = Sim::new(StaticWorld::empty(), SimulationClock::new());
        let id = sim
            .spawn(
                Pose::identity(),
                Some(MoverVolume::ball(0.5)),
                FirstPersonTuning::default(),
                MoverConfig::default(),
            )
            .unwrap();
        (sim, id)
    }

    #[test]
    fn duplicate_clock_is_rejected() {
        let (mut sim, _) = sim_with_mover();
        sim.fixed_tick(DEFAULT_FIXED_DT);

        let before = sim.clock().fixed_time();
        assert_eq!(
            sim.install_clock(SimulationClock::seeded(100.0, 0.0, 100.0, 0.0)),
            Err(SimError::DuplicateClock)
        );
        assert_eq!(sim.clock().fixed_time(), before);
    }

    #[test]
    fn ticks_and_frames_advance_the_owned_clock() {
        let (mut sim, _) = sim_with_mover();
        sim.fixed_tick(DEFAULT_FIXED_DT);
        sim.fixed_tick(DEFAULT_FIXED_DT);
        sim.render_frame(0.05);

        assert_relative_eq!(sim.clock().fixed_time(), 0.04, epsilon = 1.0e-6);
        assert_relative_eq!(sim.clock().render_time(), 0.05, epsilon = 1.0e-6);
        assert_relative_eq!(sim.timeline().fixed_new(), 0.04, epsilon = 1.0e-6);
    }

    #[test]
    fn visual_pose_lags_between_ticks() {
        let (mut sim, id) = sim_with_mover();
        sim.set_input(id, TickInput::movement(Vec3::z())).unwrap();

        sim.fixed_tick(DEFAULT_FIXED_DT);
        sim.fixed_tick(DEFAULT_FIXED_DT);
        let previous = sim.mover(id).unwrap().pose().translation;
        sim.fixed_tick(DEFAULT_FIXED_DT);
        let current = sim.authoritative_pose(id).unwrap().translation;

        // Half a tick past the newest fixed timestamp.
        let factor = sim.render_frame(3.5 * f64::from(DEFAULT_FIXED_DT));
        assert_relative_eq!(factor, 0.5, epsilon = 1.0e-3);

        let visual = sim.visual_pose(id).unwrap().translation;
        assert!(visual.z > previous.z && visual.z < current.z);
    }

    #[test]
    fn disabled_interpolation_shows_authoritative_pose() {
        let (mut sim, id) = sim_with_mover();
        sim.set_input(id, TickInput::movement(Vec3::z())).unwrap();
        sim.fixed_tick(DEFAULT_FIXED_DT);
        sim.fixed_tick(DEFAULT_FIXED_DT);

        sim.set_interpolation_enabled(id, false).unwrap();
        sim.render_frame(0.001);
        assert_eq!(
            sim.visual_pose(id).unwrap(),
            sim.authoritative_pose(id).unwrap()
        );
    }

    #[test]
    fn stale_ids_are_unknown() {
        let (mut sim, id) = sim_with_mover();
        sim.despawn(id).unwrap();

        assert_eq!(sim.velocity(id), Err(SimError::UnknownEntity(id)));
        assert_eq!(
            sim.set_input(id, TickInput::default()),
            Err(SimError::UnknownEntity(id))
        );
        assert!(sim.is_empty());
    }

    #[test]
    fn invalid_tuning_rejects_spawn() {
        let mut sim = Sim::new(StaticWorld::empty(), SimulationClock::new());
        let mut tuning = FirstPersonTuning::default();
        tuning.sideways.deceleration = -3.0;

        let res = sim.spawn(Pose::identity(), None, tuning, MoverConfig::default());
        assert!(matches!(res, Err(SimError::InvalidConfig(_))));
        assert!(sim.is_empty());
    }
}
