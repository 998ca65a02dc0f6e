//! Health Level Scale
//!
//! The level is an `f32` on a 0–100 scale everywhere: tracker math, clamping,
//! display mapping and reports all use the same bounds.

use super::time::MS_PER_MINUTE;

/// Lower bound of the health level.
pub const LEVEL_MIN: f32 = 0.0;

/// Upper bound of the health level.
pub const LEVEL_MAX: f32 = 100.0;

/// Default time to drain a full level while sitting (milliseconds).
///
/// 30 minutes of continuous sitting empties the bar.
pub const DEFAULT_TIME_TO_DISCHARGE_MS: u64 = 30 * MS_PER_MINUTE;

/// Default time to refill an empty level while standing (milliseconds).
///
/// 10 minutes of standing refills the bar.
pub const DEFAULT_TIME_TO_RECHARGE_MS: u64 = 10 * MS_PER_MINUTE;

// ===== LED BAR =====

/// Number of segments on the LED bar.
pub const LED_BAR_SEGMENTS: f32 = 10.0;

/// Segments shown when the level is exactly empty.
///
/// Half a segment keeps the bar visibly powered.
pub const EMPTY_BAR_SEGMENTS: f32 = 0.5;
