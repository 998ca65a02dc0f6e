//! Classifier Defaults
//!
//! Defaults used to turn ultrasonic ranger readings into a posture.

// ===== CLASSIFIER DEFAULTS =====

/// Default distance below which the subject counts as sitting (cm).
///
/// The ranger faces the chair back: a seated body reads well inside this,
/// an empty chair or a standing user reads farther.
pub const DEFAULT_THRESHOLD_DISTANCE_CM: f32 = 60.0;

/// Default hysteresis bound K.
///
/// The vote accumulator lives in `[-K, K]`; a decision flips only when the
/// accumulator would leave that band.
pub const DEFAULT_VOTE_BOUND: u16 = 5;

/// Default number of pings per majority-vote poll.
pub const DEFAULT_POLL_SIZE: u16 = 10;
