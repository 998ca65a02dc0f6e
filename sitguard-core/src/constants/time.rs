//! Time-Related Constants
//!
//! Time unit conversions and the control-loop cadence. All timestamps in the
//! core are milliseconds since boot.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u64 = 60;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = MS_PER_SECOND * SECONDS_PER_MINUTE;

// ===== CONTROL LOOP =====

/// Default interval between control-loop ticks (milliseconds).
///
/// One ultrasonic ping per tick. With the default vote bound of 5 a posture
/// change is confirmed after 6 ticks, i.e. about 1.2 s.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Default interval between periodic snapshot reports (milliseconds).
///
/// Snapshots are only sent while the level is below maximum, so an idle
/// desk with a full bar stays quiet.
pub const DEFAULT_REPORT_INTERVAL_MS: u64 = MS_PER_MINUTE;
