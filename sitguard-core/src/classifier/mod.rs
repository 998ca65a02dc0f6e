//! Occupancy Classifiers
//!
//! ## Overview
//!
//! An ultrasonic ranger is noisy: a sleeve crossing the beam, a missed echo or
//! a chair creaking back all produce single wrong readings. Flipping between
//! "sitting" and "standing" on every such sample would charge the health level
//! with garbage and spam the event store. The classifiers here turn raw
//! distances into a *debounced* boolean.
//!
//! A sample votes "occupied" when `distance < threshold`.
//!
//! ## Strategies
//!
//! Both implement [`OccupancyClassifier`](crate::traits::OccupancyClassifier),
//! so the monitor does not care which one it drives.
//!
//! ### Hysteresis counter (default)
//!
//! One sample per call. A signed accumulator moves one step per vote and is
//! kept inside `[-K, K]`:
//!
//! ```text
//!   -K-1 │ -K ........ 0 ........ +K │ K+1
//!  ──────┼───────────────────────────┼──────
//!  false │    hold previous decision │ true
//! ```
//!
//! Leaving the band decides, and the accumulator is clamped back onto the
//! edge. From a saturated edge a flip needs `2K + 1` net votes the other way.
//! O(1) memory, one ping per tick, no sample history.
//!
//! ### Majority poll
//!
//! N samples per call, occupied iff more than half of the successful reads
//! say so. No state between calls, higher latency, N pings per decision.
//! Kept for equivalence testing against the hysteresis counter.
//!
//! ## Failed Reads
//!
//! A failed read (`WouldBlock`, a driver error, or a non-finite number) is a
//! **neutral vote** in both strategies: it moves nothing and is only counted
//! (see [`OccupancyClassifier::failed_reads`](crate::traits::OccupancyClassifier::failed_reads)).
//!
//! ## Usage Example
//!
//! ```rust
//! use sitguard_core::classifier::HysteresisClassifier;
//! use sitguard_core::traits::OccupancyClassifier;
//!
//! // Subject sits down: every ping reads 40 cm against a 60 cm threshold
//! let source = || -> nb::Result<f32, sitguard_core::SensorError> { Ok(40.0) };
//! let mut classifier = HysteresisClassifier::new(source, 60.0)?;
//!
//! let mut sitting = false;
//! for _ in 0..5 {
//!     sitting = classifier.decide(sitting);
//!     assert!(!sitting); // still inside the band
//! }
//! sitting = classifier.decide(sitting);
//! assert!(sitting); // sixth vote crosses +5
//! # Ok::<(), sitguard_core::ConfigError>(())
//! ```

mod hysteresis;
mod majority;
mod utils;

pub use hysteresis::HysteresisClassifier;
pub use majority::MajorityVoteClassifier;
pub use utils::{classify_reading, Vote};
