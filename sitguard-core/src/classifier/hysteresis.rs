//! Hysteresis vote counter
//!
//! One ping per call, a bounded signed accumulator, and a decision that only
//! changes when the accumulator tries to leave `[-K, K]`.

use crate::{
    constants::sensors::DEFAULT_VOTE_BOUND,
    errors::{ConfigError, ConfigResult},
    traits::{OccupancyClassifier, SampleSource},
};

use super::utils::{self, Vote};

/// Debouncing classifier backed by a bidirectional vote counter
#[derive(Debug, Clone)]
pub struct HysteresisClassifier<S> {
    source: S,

    /// Readings strictly below this distance vote "occupied"
    threshold_cm: f32,

    /// K: the accumulator lives in `[-bound, bound]`
    bound: i32,

    /// Net votes, positive leaning "occupied"
    counter: i32,

    failed_reads: u32,
}

impl<S: SampleSource> HysteresisClassifier<S> {
    /// Create classifier with the default bound
    pub fn new(source: S, threshold_cm: f32) -> ConfigResult<Self> {
        Self::with_bound(source, threshold_cm, DEFAULT_VOTE_BOUND)
    }

    /// Create classifier with a custom bound K (at least 1)
    pub fn with_bound(source: S, threshold_cm: f32, bound: u16) -> ConfigResult<Self> {
        if bound == 0 {
            return Err(ConfigError::InvalidVoteBound);
        }

        Ok(Self {
            source,
            threshold_cm: utils::check_threshold(threshold_cm)?,
            bound: i32::from(bound),
            counter: 0,
            failed_reads: 0,
        })
    }

    /// Current accumulator value
    pub fn counter(&self) -> i32 {
        self.counter
    }

    /// Configured bound K
    pub fn bound(&self) -> i32 {
        self.bound
    }

    /// Configured sitting threshold (cm)
    pub fn threshold_cm(&self) -> f32 {
        self.threshold_cm
    }

    /// Access the sample source, e.g. to reconfigure the driver
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Give the sample source back
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: SampleSource> OccupancyClassifier for HysteresisClassifier<S> {
    fn decide(&mut self, previous: bool) -> bool {
        let reading = self.source.read_distance_cm();

        match utils::classify_reading(reading, self.threshold_cm) {
            Vote::Occupied => self.counter += 1,
            Vote::Vacant => self.counter -= 1,
            Vote::Abstain => {
                self.failed_reads = self.failed_reads.saturating_add(1);
                log_debug!("Distance read failed, abstaining (counter {})", self.counter);
            }
        }

        if self.counter < -self.bound {
            self.counter = -self.bound;
            false
        } else if self.counter > self.bound {
            self.counter = self.bound;
            true
        } else {
            previous
        }
    }

    fn failed_reads(&self) -> u32 {
        self.failed_reads
    }
}
