//! Simulation clock and interpolation timeline as Bevy resources.
//!
//! Bevy runs `FixedUpdate` inside `RunFixedMainLoop`, before `Update`, so by the time the
//! render clock advances every fixed tick of the frame has already been recorded.

use bevy::prelude::*;
use sim::{ClockSlot, InterpolationTimeline, SimulationClock};

/// Ordering of the simulation systems inside `FixedUpdate` and `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSystems {
    /// Advance a clock and update the timeline.
    Clock,
    /// Step every mover.
    Step,
    /// Rotate pose snapshots after the step.
    Snapshot,
    /// Blend visual poses.
    Interpolate,
}

#[derive(Resource, Default)]
pub struct SimClock(pub ClockSlot);

#[derive(Resource)]
pub struct SimTimeline(pub InterpolationTimeline);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<SimClock>();
    app.insert_resource(SimTimeline(InterpolationTimeline::new(
        &SimulationClock::new(),
    )));
    app.insert_resource(Time::<Fixed>::from_seconds(f64::from(sim::DEFAULT_FIXED_DT)));

    app.configure_sets(
        FixedUpdate,
        (SimSystems::Clock, SimSystems::Step, SimSystems::Snapshot).chain(),
    );
    app.configure_sets(Update, SimSystems::Clock.before(SimSystems::Interpolate));

    app.add_systems(Startup, install_clock);
    app.add_systems(FixedUpdate, advance_fixed_clock.in_set(SimSystems::Clock));
    app.add_systems(Update, advance_render_clock.in_set(SimSystems::Clock));
}

/// Seed the clock from Bevy's own (single precision) times.
fn install_clock(
    mut slot: ResMut<SimClock>,
    mut timeline: ResMut<SimTimeline>,
    time: Res<Time<Virtual>>,
    fixed: Res<Time<Fixed>>,
) {
    let clock = SimulationClock::seeded(
        time.elapsed_secs_f64(),
        time.delta_secs_f64(),
        fixed.elapsed_secs_f64(),
        fixed.delta_secs_f64(),
    );
    if slot.0.install(clock).is_err() {
        return;
    }
    timeline.0 = InterpolationTimeline::new(&clock);
    debug!(
        "Simulation clock installed at render {:.4}s, fixed {:.4}s",
        clock.render_time(),
        clock.fixed_time()
    );
}

fn advance_fixed_clock(
    time: Res<Time>,
    mut slot: ResMut<SimClock>,
    mut timeline: ResMut<SimTimeline>,
) {
    let Some(clock) = slot.0.get_mut() else {
        return;
    };
    clock.advance_fixed(time.delta_secs_f64());
    timeline.0.on_fixed_tick(clock);
}

fn advance_render_clock(
    time: Res<Time>,
    mut slot: ResMut<SimClock>,
    mut timeline: ResMut<SimTimeline>,
) {
    let Some(clock) = slot.0.get_mut() else {
        return;
    };
    clock.advance_render(time.delta_secs_f64());
    timeline.0.on_render_frame(clock);
}
