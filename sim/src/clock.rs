//! Double-precision simulation clock.
//!
//! Hosts usually track time in `f32`, which loses millisecond resolution after a few hours.
//! The clock keeps its own `f64` render and fixed timelines instead. Stored values carry a
//! constant `CLOCK_OFFSET` so increments round uniformly; reads subtract it back out.

use crate::{
    constants::CLOCK_OFFSET,
    error::{Result, SimError},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationClock {
    render: f64,
    fixed: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationClock {
    /// Both timelines start at zero.
    pub fn new() -> Self {
        Self {
            render: CLOCK_OFFSET,
            fixed: CLOCK_OFFSET,
        }
    }

    /// Start from the host's (low precision) times.
    ///
    /// Reported times begin at `time - delta` for each timeline, so the first advance by the
    /// host's delta lands on the host's current time.
    pub fn seeded(host_time: f64, host_delta: f64, host_fixed_time: f64, host_fixed_delta: f64) -> Self {
        Self {
            render: CLOCK_OFFSET + (host_time - host_delta),
            fixed: CLOCK_OFFSET + (host_fixed_time - host_fixed_delta),
        }
    }

    /// Advance the render timeline. Negative or non-finite deltas are ignored.
    pub fn advance_render(&mut self, delta: f64) {
        if accept_delta("render", delta) {
            self.render += delta;
        }
    }

    /// Advance the fixed timeline. Negative or non-finite deltas are ignored.
    pub fn advance_fixed(&mut self, delta: f64) {
        if accept_delta("fixed", delta) {
            self.fixed += delta;
        }
    }

    #[inline]
    pub fn render_time(&self) -> f64 {
        self.render - CLOCK_OFFSET
    }

    #[inline]
    pub fn fixed_time(&self) -> f64 {
        self.fixed - CLOCK_OFFSET
    }
}

fn accept_delta(timeline: &str, delta: f64) -> bool {
    if delta.is_finite() && delta >= 0.0 {
        return true;
    }
    log::warn!("Ignoring invalid {timeline} clock delta {delta}");
    false
}

/// Owner slot for the single clock instance.
///
/// The first `install` wins. Later installs are rejected and the first clock keeps running.
#[derive(Debug, Default)]
pub struct ClockSlot {
    clock: Option<SimulationClock>,
}

impl ClockSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot that already owns `clock`.
    pub fn with(clock: SimulationClock) -> Self {
        Self { clock: Some(clock) }
    }

    pub fn install(&mut self, clock: SimulationClock) -> Result<()> {
        if self.clock.is_some() {
            log::error!("A simulation clock is already installed; discarding the duplicate");
            return Err(SimError::DuplicateClock);
        }
        self.clock = Some(clock);
        Ok(())
    }

    pub fn get(&self) -> Option<&SimulationClock> {
        self.clock.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut SimulationClock> {
        self.clock.as_mut()
    }

    pub fn is_installed(&self) -> bool {
        self.clock.is_some()
    }
}
