/// Default fixed simulation step in seconds (50 Hz).
pub const DEFAULT_FIXED_DT: f32 = 0.02;

/// Default number of depenetration passes per fixed tick.
///
/// Each pass re-queries overlaps, so corners that push the mover from one shape
/// into another settle within a few passes.
pub const DEFAULT_MAX_ITERATIONS: u8 = 5;

/// Default magnitude below which a per-axis depenetration correction is dropped (meters).
///
/// Resting against a surface produces correction noise on the order of float epsilon; snapping
/// it to zero keeps the mover from visibly trembling. This is a tunable, not a physical constant.
pub const DEFAULT_SNAP_EPSILON: f32 = 5.0e-6;

/// Minimum component of a (unit) separation direction, expressed in the mover's local frame,
/// for that local axis to count as blocked.
pub const BLOCKED_AXIS_EPS: f32 = 1.0e-4;

/// Default yaw speed applied to the horizontal look input (radians per second).
pub const DEFAULT_TURN_SPEED: f32 = 5.235_988; // 300 degrees/s

/// Offset added to the stored clock values (2^32 seconds).
///
/// Stored values live in `[2^32, 2^33)` for any realistic session, so every increment is
/// rounded with the same absolute error. Reported times subtract the offset back out.
pub const CLOCK_OFFSET: f64 = 4_294_967_296.0;
