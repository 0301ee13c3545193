/*!
Render interpolation between fixed simulation ticks.

Rendering runs at a variable rate while the simulation advances in fixed steps. Each
interpolated entity keeps the poses committed by the two most recent fixed ticks and blends
between them using a factor derived from the simulation clock:

```text
factor = (render_time - fixed_new) / (fixed_new - fixed_old)
```

The blended pose is visual only; it never feeds back into the simulation.
*/

use crate::{
    clock::SimulationClock,
    types::{Pose, Quat, Vec3},
};

/// When the sine of the half-angle between the rotations drops below this, slerp is
/// ill-conditioned and a normalized lerp is used instead.
const SLERP_EPSILON: f32 = 1.0e-6;

/// Timestamps of the two most recent fixed ticks and the current blend factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterpolationTimeline {
    fixed_old: f64,
    fixed_new: f64,
    factor: f32,
}

impl InterpolationTimeline {
    pub fn new(clock: &SimulationClock) -> Self {
        let now = clock.fixed_time();
        Self {
            fixed_old: now,
            fixed_new: now,
            factor: 1.0,
        }
    }

    /// Record the timestamp of a fixed tick that just advanced `clock`.
    pub fn on_fixed_tick(&mut self, clock: &SimulationClock) {
        self.fixed_old = self.fixed_new;
        self.fixed_new = clock.fixed_time();
    }

    /// Recompute the factor for the render time in `clock`. Returns the new factor.
    ///
    /// The result is clamped into `[0, 1]` and is exactly 1 when both timestamps are equal.
    pub fn on_render_frame(&mut self, clock: &SimulationClock) -> f32 {
        let span = self.fixed_new - self.fixed_old;
        self.factor = if span == 0.0 {
            1.0
        } else {
            let t = (clock.render_time() - self.fixed_new) / span;
            if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 1.0 }
        };
        self.factor
    }

    #[inline]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    #[inline]
    pub fn fixed_old(&self) -> f64 {
        self.fixed_old
    }

    #[inline]
    pub fn fixed_new(&self) -> f64 {
        self.fixed_new
    }
}

/// The two most recent committed poses, as a size-2 ring buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseHistory {
    slots: [Pose; 2],
    head: usize,
}

impl PoseHistory {
    pub fn new(live: Pose) -> Self {
        Self {
            slots: [live, live],
            head: 0,
        }
    }

    /// `previous <- current`, `current <- live`.
    #[inline]
    pub fn rotate(&mut self, live: Pose) {
        self.head ^= 1;
        self.slots[self.head] = live;
    }

    /// Forget history: both snapshots become `live`.
    #[inline]
    pub fn reset(&mut self, live: Pose) {
        self.slots = [live, live];
    }

    #[inline]
    pub fn previous(&self) -> &Pose {
        &self.slots[self.head ^ 1]
    }

    #[inline]
    pub fn current(&self) -> &Pose {
        &self.slots[self.head]
    }

    /// Blend `previous` toward `current` by `t`.
    ///
    /// Translation and scale are blended linearly, rotation along the shortest arc.
    /// `t <= 0` and `t >= 1` return the snapshots exactly.
    pub fn blend(&self, t: f32) -> Pose {
        let (a, b) = (self.previous(), self.current());
        if t <= 0.0 {
            return *a;
        }
        if t >= 1.0 {
            return *b;
        }
        Pose {
            translation: lerp(&a.translation, &b.translation, t),
            rotation: slerp(&a.rotation, &b.rotation, t),
            scale: lerp(&a.scale, &b.scale, t),
        }
    }
}

#[inline]
fn lerp(a: &Vec3, b: &Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

#[inline]
fn slerp(a: &Quat, b: &Quat, t: f32) -> Quat {
    a.try_slerp(b, t, SLERP_EPSILON).unwrap_or_else(|| {
        // Keep `b` in `a`'s hemisphere or the lerp can pass through zero.
        let b = if a.coords.dot(&b.coords) < 0.0 {
            Quat::new_unchecked(-b.into_inner())
        } else {
            *b
        };
        a.nlerp(&b, t)
    })
}

/// Per-entity interpolation state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderInterpolator {
    history: PoseHistory,
    enabled: bool,
}

impl RenderInterpolator {
    /// Enabled interpolator with both snapshots at `live`.
    pub fn new(live: Pose) -> Self {
        Self {
            history: PoseHistory::new(live),
            enabled: true,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enabling a disabled interpolator resets both snapshots to `live`, so the first blend
    /// does not sweep across whatever happened while it was off.
    pub fn set_enabled(&mut self, enabled: bool, live: Pose) {
        if enabled && !self.enabled {
            self.history.reset(live);
        }
        self.enabled = enabled;
    }

    /// Called once per fixed tick, after the simulation committed `live`.
    pub fn on_fixed_tick(&mut self, live: Pose) {
        if self.enabled {
            self.history.rotate(live);
        }
    }

    /// Pose to render this frame.
    pub fn visual_pose(&self, factor: f32, live: &Pose) -> Pose {
        if self.enabled {
            self.history.blend(factor)
        } else {
            *live
        }
    }

    pub fn history(&self) -> &PoseHistory {
        &self.history
    }
}
