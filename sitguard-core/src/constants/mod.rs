//! Constants for SitGuard Core
//!
//! Centralized defaults used by the classifier, the level tracker and the
//! monitor. Every numeric value lives here with its unit in the name.
//!
//! ## Organization
//!
//! - **Time**: unit conversions and control-loop intervals
//! - **Sensors**: classifier defaults
//! - **Level**: health level scale, time constants and LED bar geometry
//! - **Buffers**: bounded storage used by the monitor

/// Time-related constants for intervals and conversions.
pub mod time;

/// Classifier defaults.
pub mod sensors;

/// Health level scale and integration defaults.
pub mod level;

/// Buffer sizes for bounded, allocation-free storage.
pub mod buffers;

pub use time::{MS_PER_SECOND, MS_PER_MINUTE, DEFAULT_TICK_INTERVAL_MS, DEFAULT_REPORT_INTERVAL_MS};

pub use sensors::{DEFAULT_THRESHOLD_DISTANCE_CM, DEFAULT_VOTE_BOUND, DEFAULT_POLL_SIZE};

pub use level::{
    LEVEL_MIN, LEVEL_MAX, DEFAULT_TIME_TO_DISCHARGE_MS, DEFAULT_TIME_TO_RECHARGE_MS,
    LED_BAR_SEGMENTS, EMPTY_BAR_SEGMENTS,
};

pub use buffers::REPORT_OUTBOX_SIZE;
