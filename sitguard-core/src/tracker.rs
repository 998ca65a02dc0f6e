//! Health Level Tracker
//!
//! ## Overview
//!
//! The health level is a bounded integrator: it drains while the subject sits
//! and refills while they stand. Rates are expressed as *time constants*, the
//! milliseconds needed to traverse the whole 0–100 range in one direction:
//!
//! ```text
//! sitting:   level -= 100 * elapsed / time_to_discharge
//! standing:  level += 100 * elapsed / time_to_recharge
//! ```
//!
//! ## Transition Ticks
//!
//! Elapsed time is only integrated when the posture was the same at both ends
//! of the tick. On the tick where the posture changes nobody knows *when*
//! inside the interval the change happened, so that interval is discarded
//! instead of being charged entirely to one regime:
//!
//! ```text
//!   tick:        t0      t1      t2      t3      t4
//!   posture:     sit     sit     stand   stand   stand
//!   integrated:      -Δ      ──      +Δ      +Δ
//!                          (dropped)
//! ```
//!
//! `last_tick` advances on every call regardless, so the dropped interval is
//! never picked up later.
//!
//! ## Degenerate Inputs
//!
//! - Timestamp behind `last_tick`: elapsed is zero, the tracker re-bases on
//!   the new timestamp.
//! - Zero time constant: rejected at construction.
//! - Huge elapsed: clamps to the bound, never overflows to infinity/NaN in a
//!   way that escapes the range.

use crate::{
    constants::level::{LEVEL_MAX, LEVEL_MIN},
    errors::{ConfigError, ConfigResult},
    time::{elapsed_ms, Timestamp},
};

/// Clamped linear integrator of sitting/standing time
#[derive(Debug, Clone)]
pub struct LevelTracker {
    /// Current level, always within `[LEVEL_MIN, LEVEL_MAX]`
    ///
    /// Held in f64 so that many small steps sum to the same value as one
    /// large step; f32 only appears at the API boundary.
    level: f64,

    /// Timestamp of the previous tick (or construction)
    last_tick: Timestamp,

    /// Milliseconds to drain a full level while sitting
    time_to_discharge_ms: u64,

    /// Milliseconds to refill an empty level while standing
    time_to_recharge_ms: u64,
}

impl LevelTracker {
    /// Create a tracker
    ///
    /// `level` lets a device resume from a persisted value; finite values
    /// outside the range are clamped into it.
    pub fn new(
        level: f32,
        start: Timestamp,
        time_to_discharge_ms: u64,
        time_to_recharge_ms: u64,
    ) -> ConfigResult<Self> {
        if !level.is_finite() {
            return Err(ConfigError::InvalidLevel);
        }
        if time_to_discharge_ms == 0 {
            return Err(ConfigError::ZeroTimeConstant { which: "discharge" });
        }
        if time_to_recharge_ms == 0 {
            return Err(ConfigError::ZeroTimeConstant { which: "recharge" });
        }

        Ok(Self {
            level: clamp_level(f64::from(level)),
            last_tick: start,
            time_to_discharge_ms,
            time_to_recharge_ms,
        })
    }

    /// Create a tracker starting from a full level
    pub fn full(start: Timestamp, time_to_discharge_ms: u64, time_to_recharge_ms: u64) -> ConfigResult<Self> {
        Self::new(LEVEL_MAX, start, time_to_discharge_ms, time_to_recharge_ms)
    }

    /// Advance the integrator to `now`
    ///
    /// Integrates only when `was_sitting == is_sitting`; always moves
    /// `last_tick` to `now`. Returns the new level.
    pub fn tick(&mut self, was_sitting: bool, is_sitting: bool, now: Timestamp) -> f32 {
        let elapsed = elapsed_ms(self.last_tick, now);

        if was_sitting == is_sitting && elapsed > 0 {
            self.level = if is_sitting {
                clamp_level(self.level - span_fraction(elapsed, self.time_to_discharge_ms))
            } else {
                clamp_level(self.level + span_fraction(elapsed, self.time_to_recharge_ms))
            };
        }

        self.last_tick = now;
        self.level()
    }

    /// Re-base the tracker on `now` without integrating
    ///
    /// Used when the control loop starts later than the tracker was built.
    pub fn rebase(&mut self, now: Timestamp) {
        self.last_tick = now;
    }

    /// Current level in `[0, 100]`
    pub fn level(&self) -> f32 {
        self.level as f32
    }

    /// Level truncated to a whole percentage
    pub fn percent(&self) -> u8 {
        // level is clamped, truncation cannot exceed 100
        libm::trunc(self.level) as u8
    }

    /// Timestamp of the previous tick
    pub fn last_tick(&self) -> Timestamp {
        self.last_tick
    }

    /// Whether the level sits at the top of the range
    pub fn is_full(&self) -> bool {
        self.level >= f64::from(LEVEL_MAX)
    }

    /// Whether the level sits at the bottom of the range
    pub fn is_empty(&self) -> bool {
        self.level <= f64::from(LEVEL_MIN)
    }

    /// Configured discharge time constant in ms
    pub fn time_to_discharge_ms(&self) -> u64 {
        self.time_to_discharge_ms
    }

    /// Configured recharge time constant in ms
    pub fn time_to_recharge_ms(&self) -> u64 {
        self.time_to_recharge_ms
    }
}

/// Portion of the full range covered in `elapsed` ms at the given time constant
///
/// Computed in f64: a u64 millisecond count does not fit f32's mantissa.
fn span_fraction(elapsed: u64, time_constant_ms: u64) -> f64 {
    let range = f64::from(LEVEL_MAX - LEVEL_MIN);
    range * elapsed as f64 / time_constant_ms as f64
}

fn clamp_level(level: f64) -> f64 {
    level.clamp(f64::from(LEVEL_MIN), f64::from(LEVEL_MAX))
}
