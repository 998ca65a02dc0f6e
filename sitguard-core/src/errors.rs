//! Error Types for Configuration and Sensor Failures
//!
//! ## Design Philosophy
//!
//! Errors in SitGuard follow the same rules as the rest of the core:
//!
//! 1. **Small Size**: variants carry at most a couple of scalars, so errors can
//!    be returned from the control loop without touching the heap.
//!
//! 2. **No Heap Allocation**: messages are `&'static str` only.
//!
//! 3. **Copy Semantics**: every error is `Copy`.
//!
//! ## Error Categories
//!
//! ### Configuration
//! - `ZeroTimeConstant`: a discharge/recharge constant of zero would divide by zero
//! - `InvalidThreshold`: threshold distance is zero, negative or not a number
//! - `InvalidVoteBound` / `InvalidPollSize`: classifier cannot decide anything
//! - `InvalidLevel`: resumed level is NaN or infinite
//!
//! Configuration errors are raised at construction time. Nothing is validated
//! again inside `tick()` or `decide()`.
//!
//! ### Sensor
//! - `Timeout`: no echo came back within the measurement window
//! - `OutOfRange`: reading outside what the ranger can physically report
//! - `Bus`: the transport to the sensor failed
//!
//! Sensor errors never reach the caller of `decide()`: the classifiers count
//! them as neutral votes (see [`crate::classifier`]).
//!
//! ```rust
//! use sitguard_core::{ConfigError, LevelTracker};
//!
//! match LevelTracker::new(100.0, 0, 0, 60_000) {
//!     Err(ConfigError::ZeroTimeConstant { which }) => assert_eq!(which, "discharge"),
//!     _ => unreachable!(),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors - raised once, at construction
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Discharge or recharge constant is zero
    #[error("{which} time constant must be non-zero")]
    ZeroTimeConstant {
        /// Which constant was rejected ("discharge" or "recharge")
        which: &'static str,
    },

    /// Threshold distance must be a positive, finite number of centimeters
    #[error("Threshold distance {value} cm is not a positive number")]
    InvalidThreshold {
        /// The rejected threshold
        value: f32,
    },

    /// Hysteresis bound must be at least one vote
    #[error("Vote bound must be at least 1")]
    InvalidVoteBound,

    /// Majority poll needs at least one sample
    #[error("Poll size must be at least 1")]
    InvalidPollSize,

    /// Initial level is not a finite number
    #[error("Initial level is not a finite number")]
    InvalidLevel,
}

/// Sensor read failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No echo received in time
    #[error("Sensor timed out")]
    Timeout,

    /// Reading outside the physical range of the ranger
    #[error("Reading out of sensor range")]
    OutOfRange,

    /// Transport failure (GPIO, I2C, UART...)
    #[error("Sensor bus error: {reason}")]
    Bus {
        /// Short description from the driver
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ZeroTimeConstant { which } =>
                defmt::write!(fmt, "{} time constant is zero", which),
            Self::InvalidThreshold { value } =>
                defmt::write!(fmt, "Bad threshold {} cm", value),
            Self::InvalidVoteBound =>
                defmt::write!(fmt, "Vote bound < 1"),
            Self::InvalidPollSize =>
                defmt::write!(fmt, "Poll size < 1"),
            Self::InvalidLevel =>
                defmt::write!(fmt, "Initial level not finite"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Timeout => defmt::write!(fmt, "Sensor timeout"),
            Self::OutOfRange => defmt::write!(fmt, "Sensor out of range"),
            Self::Bus { reason } => defmt::write!(fmt, "Sensor bus: {}", reason),
        }
    }
}
