//! Core state machines for SitGuard
//!
//! Turns noisy distance pings into a debounced sitting/standing decision and
//! integrates sitting time into a bounded health level that drains while
//! sitting and refills while standing.
//!
//! Designed for small microcontrollers:
//! - `no_std` without the `std` feature
//! - No heap allocation in the control loop
//! - O(1) state per component
//!
//! ```no_run
//! use sitguard_core::{HysteresisClassifier, LevelTracker, OccupancyClassifier};
//!
//! # fn ping() -> nb::Result<f32, sitguard_core::SensorError> { Ok(45.0) }
//! # fn millis() -> u64 { 0 }
//! let mut classifier = HysteresisClassifier::new(ping, 60.0)?;
//! let mut tracker = LevelTracker::full(millis(), 30 * 60_000, 10 * 60_000)?;
//!
//! let mut sitting = false;
//! loop {
//!     let was_sitting = sitting;
//!     sitting = classifier.decide(was_sitting);
//!     let level = tracker.tick(was_sitting, sitting, millis());
//!     // render level, report transitions...
//! #   break;
//! }
//! # Ok::<(), sitguard_core::ConfigError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod classifier;
pub mod config;
pub mod constants;
pub mod display;
pub mod errors;
pub mod events;
pub mod monitor;
pub mod status;
pub mod time;
pub mod tracker;
pub mod traits;

// Public API
pub use classifier::{HysteresisClassifier, MajorityVoteClassifier};
pub use config::{LinkMode, MonitorConfig, RemoteParams};
pub use display::BarLevel;
pub use errors::{ConfigError, ConfigResult, SensorError};
pub use events::{ReportAction, ReportEvent};
pub use monitor::{Monitor, MonitorStats, TickOutcome};
pub use status::{SharedStatus, StatusSnapshot};
pub use time::{ManualClock, TimeSource, Timestamp};
pub use tracker::LevelTracker;
pub use traits::{LevelDisplay, NoReporter, OccupancyClassifier, Reporter, SampleSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
