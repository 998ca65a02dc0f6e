//! Monitor configuration
//!
//! ## Sources
//!
//! Parameters come from two places:
//!
//! 1. Compile-time defaults in [`crate::constants`]
//! 2. Optionally, [`RemoteParams`] fetched from the event store at boot
//!
//! Remote values replace the defaults only if every one of them is usable.
//! A zero anywhere means the store is misconfigured; the device then keeps
//! its defaults and runs offline rather than trusting half a config:
//!
//! ```rust
//! use sitguard_core::config::{LinkMode, MonitorConfig, RemoteParams};
//!
//! let remote = RemoteParams {
//!     time_to_discharge_ms: 0, // broken entry in the store
//!     time_to_recharge_ms: 300_000,
//!     threshold_distance_cm: 70,
//! };
//!
//! let (config, mode) = MonitorConfig::default().resolve_remote(Some(remote));
//! assert_eq!(mode, LinkMode::Offline);
//! assert_eq!(config, MonitorConfig::default());
//! ```
//!
//! ## Validation
//!
//! [`MonitorConfig::validate`] runs the same checks the components run at
//! construction, so a bad config can be rejected before any hardware is
//! touched.

use crate::{
    classifier::{HysteresisClassifier, MajorityVoteClassifier},
    constants::{
        level::{DEFAULT_TIME_TO_DISCHARGE_MS, DEFAULT_TIME_TO_RECHARGE_MS, LEVEL_MAX},
        sensors::{DEFAULT_POLL_SIZE, DEFAULT_THRESHOLD_DISTANCE_CM, DEFAULT_VOTE_BOUND},
        time::DEFAULT_REPORT_INTERVAL_MS,
    },
    errors::{ConfigError, ConfigResult},
    monitor::Monitor,
    time::Timestamp,
    tracker::LevelTracker,
    traits::{LevelDisplay, NoReporter, OccupancyClassifier, Reporter, SampleSource},
};

/// Whether the monitor reports to a remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Events are delivered to the reporter
    Online,
    /// Reporter unused, display only
    Offline,
}

/// Parameters stored remotely, as integers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoteParams {
    /// Milliseconds to drain a full level
    pub time_to_discharge_ms: u64,
    /// Milliseconds to refill an empty level
    pub time_to_recharge_ms: u64,
    /// Sitting threshold in whole centimetres
    pub threshold_distance_cm: u32,
}

impl RemoteParams {
    /// All values present and non-zero
    pub fn is_usable(&self) -> bool {
        self.time_to_discharge_ms != 0 && self.time_to_recharge_ms != 0 && self.threshold_distance_cm != 0
    }
}

/// Full configuration for a monitor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorConfig {
    /// Readings below this distance vote "sitting" (cm)
    pub threshold_distance_cm: f32,

    /// Milliseconds to drain a full level while sitting
    pub time_to_discharge_ms: u64,

    /// Milliseconds to refill an empty level while standing
    pub time_to_recharge_ms: u64,

    /// Hysteresis bound K
    pub vote_bound: u16,

    /// Pings per majority poll
    pub poll_size: u16,

    /// Snapshot cadence while the level is not full; 0 disables snapshots
    pub report_interval_ms: u64,

    /// Level to start (or resume) from
    pub initial_level: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold_distance_cm: DEFAULT_THRESHOLD_DISTANCE_CM,
            time_to_discharge_ms: DEFAULT_TIME_TO_DISCHARGE_MS,
            time_to_recharge_ms: DEFAULT_TIME_TO_RECHARGE_MS,
            vote_bound: DEFAULT_VOTE_BOUND,
            poll_size: DEFAULT_POLL_SIZE,
            report_interval_ms: DEFAULT_REPORT_INTERVAL_MS,
            initial_level: LEVEL_MAX,
        }
    }
}

impl MonitorConfig {
    /// Sitting threshold in cm
    pub fn threshold_cm(mut self, cm: f32) -> Self {
        self.threshold_distance_cm = cm;
        self
    }

    /// Discharge time constant
    pub fn discharge_ms(mut self, ms: u64) -> Self {
        self.time_to_discharge_ms = ms;
        self
    }

    /// Recharge time constant
    pub fn recharge_ms(mut self, ms: u64) -> Self {
        self.time_to_recharge_ms = ms;
        self
    }

    /// Hysteresis bound K
    pub fn vote_bound(mut self, bound: u16) -> Self {
        self.vote_bound = bound;
        self
    }

    /// Pings per majority poll
    pub fn poll_size(mut self, size: u16) -> Self {
        self.poll_size = size;
        self
    }

    /// Snapshot cadence; 0 disables snapshots
    pub fn report_interval_ms(mut self, ms: u64) -> Self {
        self.report_interval_ms = ms;
        self
    }

    /// Resume from a persisted level
    pub fn initial_level(mut self, level: f32) -> Self {
        self.initial_level = level;
        self
    }

    /// Check every parameter the components will check
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.threshold_distance_cm.is_finite() && self.threshold_distance_cm > 0.0) {
            return Err(ConfigError::InvalidThreshold { value: self.threshold_distance_cm });
        }
        if self.time_to_discharge_ms == 0 {
            return Err(ConfigError::ZeroTimeConstant { which: "discharge" });
        }
        if self.time_to_recharge_ms == 0 {
            return Err(ConfigError::ZeroTimeConstant { which: "recharge" });
        }
        if self.vote_bound == 0 {
            return Err(ConfigError::InvalidVoteBound);
        }
        if self.poll_size == 0 {
            return Err(ConfigError::InvalidPollSize);
        }
        if !self.initial_level.is_finite() {
            return Err(ConfigError::InvalidLevel);
        }
        Ok(())
    }

    /// Apply remotely stored parameters
    ///
    /// `None` means the store could not be reached. Unusable parameters keep
    /// the current values. Either way the device runs offline.
    pub fn resolve_remote(self, remote: Option<RemoteParams>) -> (Self, LinkMode) {
        match remote {
            Some(params) if params.is_usable() => {
                let config = Self {
                    threshold_distance_cm: params.threshold_distance_cm as f32,
                    time_to_discharge_ms: params.time_to_discharge_ms,
                    time_to_recharge_ms: params.time_to_recharge_ms,
                    ..self
                };
                (config, LinkMode::Online)
            }
            Some(_) => {
                log_warn!("Invalid remote parameters, keeping defaults and going offline");
                (self, LinkMode::Offline)
            }
            None => (self, LinkMode::Offline),
        }
    }

    /// Hysteresis classifier over `source`
    pub fn hysteresis<S: SampleSource>(&self, source: S) -> ConfigResult<HysteresisClassifier<S>> {
        HysteresisClassifier::with_bound(source, self.threshold_distance_cm, self.vote_bound)
    }

    /// Majority-poll classifier over `source`
    pub fn majority<S: SampleSource>(&self, source: S) -> ConfigResult<MajorityVoteClassifier<S>> {
        MajorityVoteClassifier::with_poll_size(source, self.threshold_distance_cm, self.poll_size)
    }

    /// Level tracker starting at `start`
    pub fn tracker(&self, start: Timestamp) -> ConfigResult<LevelTracker> {
        LevelTracker::new(
            self.initial_level,
            start,
            self.time_to_discharge_ms,
            self.time_to_recharge_ms,
        )
    }

    /// Monitor wired from this config
    ///
    /// Builds the tracker and applies the snapshot cadence. The tracker is
    /// re-based when the monitor starts.
    pub fn monitor<C, D, R>(
        &self,
        classifier: C,
        display: D,
        reporter: R,
        mode: LinkMode,
    ) -> ConfigResult<Monitor<C, D, R>>
    where
        C: OccupancyClassifier,
        D: LevelDisplay,
        R: Reporter,
    {
        let tracker = self.tracker(0)?;
        Ok(Monitor::new(classifier, tracker, display, reporter, mode).with_report_interval(self.report_interval_ms))
    }

    /// Offline monitor wired from this config
    pub fn offline_monitor<C, D>(&self, classifier: C, display: D) -> ConfigResult<Monitor<C, D, NoReporter>>
    where
        C: OccupancyClassifier,
        D: LevelDisplay,
    {
        self.monitor(classifier, display, NoReporter, LinkMode::Offline)
    }
}
