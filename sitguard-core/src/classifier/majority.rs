//! Majority poll
//!
//! Takes N pings per decision and keeps no state between calls. Slower and
//! noisier on the sensor bus than the hysteresis counter, but trivially easy
//! to reason about, which makes it a good reference in tests.

use crate::{
    constants::sensors::DEFAULT_POLL_SIZE,
    errors::{ConfigError, ConfigResult},
    traits::{OccupancyClassifier, SampleSource},
};

use super::utils::{self, Vote};

/// Classifier deciding by majority over a fixed-size poll
#[derive(Debug, Clone)]
pub struct MajorityVoteClassifier<S> {
    source: S,
    threshold_cm: f32,
    poll_size: u16,
    failed_reads: u32,
}

impl<S: SampleSource> MajorityVoteClassifier<S> {
    /// Create classifier with the default poll size
    pub fn new(source: S, threshold_cm: f32) -> ConfigResult<Self> {
        Self::with_poll_size(source, threshold_cm, DEFAULT_POLL_SIZE)
    }

    /// Create classifier taking `poll_size` pings per decision
    pub fn with_poll_size(source: S, threshold_cm: f32, poll_size: u16) -> ConfigResult<Self> {
        if poll_size == 0 {
            return Err(ConfigError::InvalidPollSize);
        }

        Ok(Self {
            source,
            threshold_cm: utils::check_threshold(threshold_cm)?,
            poll_size,
            failed_reads: 0,
        })
    }

    /// Pings taken per decision
    pub fn poll_size(&self) -> u16 {
        self.poll_size
    }

    /// Configured sitting threshold (cm)
    pub fn threshold_cm(&self) -> f32 {
        self.threshold_cm
    }

    /// Access the sample source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: SampleSource> OccupancyClassifier for MajorityVoteClassifier<S> {
    fn decide(&mut self, previous: bool) -> bool {
        let mut occupied: u16 = 0;
        let mut counted: u16 = 0;

        for _ in 0..self.poll_size {
            match utils::classify_reading(self.source.read_distance_cm(), self.threshold_cm) {
                Vote::Occupied => {
                    occupied += 1;
                    counted += 1;
                }
                Vote::Vacant => counted += 1,
                Vote::Abstain => self.failed_reads = self.failed_reads.saturating_add(1),
            }
        }

        // Every ping failed: no evidence either way
        if counted == 0 {
            return previous;
        }

        occupied > counted / 2
    }

    fn failed_reads(&self) -> u32 {
        self.failed_reads
    }
}
