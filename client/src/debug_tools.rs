//! Debug/performance tooling for native dev builds.
//!
//! This plugin is compiled/used only when the caller gates it behind `dev_native`
//! (`#[cfg(feature = "dev_native")] mod debug_tools;` in `main.rs`).

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin,
};
use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;

use crate::{clock::SimTimeline, input::InputAction, player::PlayerMover};

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        LogDiagnosticsPlugin::default(),
    ));

    app.add_systems(Update, log_mover_state);
}

/// F3 dumps the player's simulation state to the log.
fn log_mover_state(
    actions: Res<ActionState<InputAction>>,
    timeline: Res<SimTimeline>,
    mover: Single<&PlayerMover>,
) {
    if !actions.just_pressed(&InputAction::DumpState) {
        return;
    }
    let state = mover.0.state();
    info!(
        "pose {:?} velocity {:?} factor {:.3} (fixed {:.4} -> {:.4})",
        state.pose.translation,
        state.velocity,
        timeline.0.factor(),
        timeline.0.fixed_old(),
        timeline.0.fixed_new(),
    );
}
