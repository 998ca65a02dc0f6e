//! Control loop driver
//!
//! ## Overview
//!
//! [`Monitor`] owns one of each collaborator and runs a single tick on
//! request. There is no global state: the device's `main` builds a monitor and
//! calls [`Monitor::tick`] from its loop.
//!
//! ```text
//!              ┌────────────┐  bool   ┌─────────────┐  level
//!  ping ──────►│ classifier │────────►│   tracker   │──────────┐
//!              └────────────┘         └─────────────┘          │
//!                                                              ▼
//!                     ┌──────────┬───────────────┬──────────────────┐
//!                     │ display  │ shared status │ outbox → reporter │
//!                     └──────────┴───────────────┴──────────────────┘
//! ```
//!
//! ## Reporting
//!
//! In [`LinkMode::Online`] events are queued in a bounded outbox and flushed
//! to the reporter on the same tick. A failing reporter keeps events queued
//! for the next tick. When the outbox overflows the oldest snapshot or
//! connected event is dropped first; sit/stand events only go once nothing
//! else is left.
//! In [`LinkMode::Offline`] nothing is queued and the reporter is never called.
//!
//! ## Usage Example
//!
//! ```rust
//! use sitguard_core::{MonitorConfig, Monitor};
//!
//! let config = MonitorConfig::default().discharge_ms(1_000);
//! let ping = || -> nb::Result<f32, sitguard_core::SensorError> { Ok(35.0) };
//!
//! let mut monitor = config.offline_monitor(config.hysteresis(ping)?, ())?;
//! monitor.start(0);
//!
//! for t in 1..=20 {
//!     monitor.tick(t * 100);
//! }
//! assert!(monitor.occupied());
//! assert!(monitor.level() < 100.0);
//! # Ok::<(), sitguard_core::ConfigError>(())
//! ```

use heapless::Deque;

use crate::{
    config::LinkMode,
    constants::{buffers::REPORT_OUTBOX_SIZE, level::LEVEL_MAX, time::DEFAULT_REPORT_INTERVAL_MS},
    display::BarLevel,
    events::ReportEvent,
    status::SharedStatus,
    time::{elapsed_ms, TimeSource, Timestamp},
    tracker::LevelTracker,
    traits::{LevelDisplay, NoReporter, OccupancyClassifier, Reporter},
};

/// Result of one control-loop tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Time this tick ran at
    pub timestamp: Timestamp,
    /// Debounced posture after this tick
    pub occupied: bool,
    /// Posture changed on this tick
    pub transition: bool,
    /// Level after this tick
    pub level: f32,
    /// Segments sent to the display
    pub segments: f32,
}

/// Counters for diagnostics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStats {
    /// Ticks run
    pub ticks: u64,
    /// Sit/stand changes
    pub transitions: u32,
    /// Events accepted by the reporter
    pub reports_sent: u32,
    /// Reporter errors, one per failed flush
    pub report_failures: u32,
    /// Events lost to outbox overflow
    pub reports_dropped: u32,
}

/// Occupancy monitor: classifier, tracker and sinks for one desk
pub struct Monitor<C, D, R> {
    classifier: C,
    tracker: LevelTracker,
    display: D,
    reporter: R,
    mode: LinkMode,
    bar: BarLevel,
    status: Option<&'static SharedStatus>,

    occupied: bool,
    last_now: Option<Timestamp>,
    last_report: Timestamp,
    report_interval_ms: u64,
    outbox: Deque<ReportEvent, REPORT_OUTBOX_SIZE>,
    stats: MonitorStats,
}

impl<C, D> Monitor<C, D, NoReporter>
where
    C: OccupancyClassifier,
    D: LevelDisplay,
{
    /// Monitor without a remote store
    pub fn offline(classifier: C, tracker: LevelTracker, display: D) -> Self {
        Self::new(classifier, tracker, display, NoReporter, LinkMode::Offline)
    }
}

impl<C, D, R> Monitor<C, D, R>
where
    C: OccupancyClassifier,
    D: LevelDisplay,
    R: Reporter,
{
    /// Build a monitor; the subject is assumed standing until proven otherwise
    pub fn new(classifier: C, tracker: LevelTracker, display: D, reporter: R, mode: LinkMode) -> Self {
        let last_report = tracker.last_tick();
        Self {
            classifier,
            tracker,
            display,
            reporter,
            mode,
            bar: BarLevel::default(),
            status: None,
            occupied: false,
            last_now: None,
            last_report,
            report_interval_ms: DEFAULT_REPORT_INTERVAL_MS,
            outbox: Deque::new(),
            stats: MonitorStats::default(),
        }
    }

    /// Snapshot cadence while not full; 0 disables snapshots
    ///
    /// [`MonitorConfig::monitor`](crate::config::MonitorConfig::monitor) sets
    /// this from the config.
    pub fn with_report_interval(mut self, ms: u64) -> Self {
        self.report_interval_ms = ms;
        self
    }

    /// Publish every tick into `status`
    pub fn with_status(mut self, status: &'static SharedStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Custom LED bar geometry
    pub fn with_bar(mut self, bar: BarLevel) -> Self {
        self.bar = bar;
        self
    }

    /// Announce the monitor and show the initial level
    ///
    /// The tracker is re-based on `now`, so time spent between building it
    /// and starting the loop is never integrated.
    pub fn start(&mut self, now: Timestamp) {
        self.tracker.rebase(now);
        self.last_now = Some(now);
        let level = self.tracker.level();

        match self.mode {
            LinkMode::Online => log_info!("Monitor started online, level {}", level),
            LinkMode::Offline => log_info!("Monitor started offline, level {}", level),
        }

        self.render(level);
        self.last_report = now;

        if self.mode == LinkMode::Online {
            self.enqueue(ReportEvent::connected(now, level, self.occupied));
            self.flush();
        }
    }

    /// Run one control-loop iteration at `now`
    pub fn tick(&mut self, now: Timestamp) -> TickOutcome {
        let was_sitting = self.occupied;

        let failures_before = self.classifier.failed_reads();
        let is_sitting = self.classifier.decide(was_sitting);
        let failures = self.classifier.failed_reads();
        if failures > failures_before {
            log_warn!("Distance sensor read failed ({} so far)", failures);
        }

        if let Some(last) = self.last_now {
            if now < last {
                log_warn!("Clock went backwards: {} -> {}", last, now);
                self.last_report = now;
            }
        }
        self.last_now = Some(now);

        let level = self.tracker.tick(was_sitting, is_sitting, now);
        self.occupied = is_sitting;
        self.stats.ticks += 1;

        let segments = self.render(level);
        log_debug!("t={} sitting={} level={}", now, is_sitting, level);

        let transition = was_sitting != is_sitting;
        if transition {
            self.stats.transitions = self.stats.transitions.saturating_add(1);
            log_info!(
                "{} at t={}, level {}",
                if is_sitting { "Sat down" } else { "Stood up" },
                now,
                level
            );
        }

        if self.mode == LinkMode::Online {
            if transition {
                self.enqueue(ReportEvent::transition(now, level, is_sitting));
                self.last_report = now;
            } else if self.snapshot_due(level, now) {
                self.enqueue(ReportEvent::snapshot(now, level, is_sitting));
                self.last_report = now;
            }
            self.flush();
        }

        TickOutcome {
            timestamp: now,
            occupied: is_sitting,
            transition,
            level,
            segments,
        }
    }

    /// Tick using a clock
    pub fn tick_with<T: TimeSource>(&mut self, clock: &T) -> TickOutcome {
        self.tick(clock.now())
    }

    /// Debounced posture after the last tick
    pub fn occupied(&self) -> bool {
        self.occupied
    }

    /// Current level
    pub fn level(&self) -> f32 {
        self.tracker.level()
    }

    /// Whether events go to the reporter
    pub fn mode(&self) -> LinkMode {
        self.mode
    }

    /// Configured snapshot cadence
    pub fn report_interval_ms(&self) -> u64 {
        self.report_interval_ms
    }

    /// Diagnostic counters
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Events waiting for the reporter
    pub fn pending_reports(&self) -> usize {
        self.outbox.len()
    }

    /// The level integrator
    pub fn tracker(&self) -> &LevelTracker {
        &self.tracker
    }

    /// The posture classifier
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// The display sink
    pub fn display(&self) -> &D {
        &self.display
    }

    /// The reporter
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// The reporter, mutably
    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    fn render(&mut self, level: f32) -> f32 {
        let segments = self.bar.segments(level);
        self.display.show(segments);
        if let Some(status) = self.status {
            status.publish(level, self.occupied);
        }
        segments
    }

    fn snapshot_due(&self, level: f32, now: Timestamp) -> bool {
        self.report_interval_ms > 0
            && level < LEVEL_MAX
            && elapsed_ms(self.last_report, now) >= self.report_interval_ms
    }

    fn enqueue(&mut self, event: ReportEvent) {
        if self.outbox.is_full() {
            if let Some(dropped) = self.evict() {
                self.stats.reports_dropped = self.stats.reports_dropped.saturating_add(1);
                log_warn!("Report outbox full, dropping {} from t={}", dropped.action, dropped.timestamp);
            }
        }
        // Cannot fail: a slot was freed above if needed
        let _ = self.outbox.push_back(event);
    }

    /// Remove the oldest non-transition event, or the oldest event if every
    /// queued event is a transition
    fn evict(&mut self) -> Option<ReportEvent> {
        let victim = self.outbox.iter().position(|e| !e.action.is_transition());
        match victim {
            None | Some(0) => self.outbox.pop_front(),
            Some(index) => {
                let mut kept = Deque::new();
                let mut dropped = None;
                for (i, event) in self.outbox.iter().enumerate() {
                    if i == index {
                        dropped = Some(*event);
                    } else {
                        // Same capacity, one fewer element
                        let _ = kept.push_back(*event);
                    }
                }
                self.outbox = kept;
                dropped
            }
        }
    }

    fn flush(&mut self) {
        while let Some(event) = self.outbox.front().copied() {
            match self.reporter.report(&event) {
                Ok(()) => {
                    self.outbox.pop_front();
                    self.stats.reports_sent = self.stats.reports_sent.saturating_add(1);
                }
                Err(e) => {
                    self.stats.report_failures = self.stats.report_failures.saturating_add(1);
                    log_warn!("Report failed, {} pending: {:?}", self.outbox.len(), e);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::HysteresisClassifier;
    use crate::errors::SensorError;
    use crate::events::ReportAction;

    #[derive(Default)]
    struct Recorder {
        events: Vec<ReportEvent>,
        fail: bool,
    }

    impl Reporter for Recorder {
        type Error = &'static str;

        fn report(&mut self, event: &ReportEvent) -> Result<(), Self::Error> {
            if self.fail {
                return Err("offline");
            }
            self.events.push(*event);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Bar {
        shown: Vec<f32>,
    }

    impl LevelDisplay for Bar {
        fn show(&mut self, segments: f32) {
            self.shown.push(segments);
        }
    }

    type Ping = fn() -> nb::Result<f32, SensorError>;

    fn near() -> nb::Result<f32, SensorError> {
        Ok(30.0)
    }

    fn far() -> nb::Result<f32, SensorError> {
        Ok(120.0)
    }

    fn online(ping: Ping, interval: u64) -> Monitor<HysteresisClassifier<Ping>, Bar, Recorder> {
        let classifier = HysteresisClassifier::with_bound(ping, 60.0, 2).unwrap();
        let tracker = LevelTracker::new(100.0, 0, 10_000, 10_000).unwrap();
        Monitor::new(classifier, tracker, Bar::default(), Recorder::default(), LinkMode::Online)
            .with_report_interval(interval)
    }

    #[test]
    fn start_announces_connection() {
        let mut monitor = online(far, 0);
        monitor.start(0);

        let events = &monitor.reporter().events;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, ReportAction::Connected);
        assert_eq!(monitor.display().shown, vec![10.0]);
    }

    #[test]
    fn one_event_per_transition() {
        let mut monitor = online(near, 0);
        monitor.start(0);

        let mut transitions = 0;
        for t in 1..=10 {
            if monitor.tick(t * 100).transition {
                transitions += 1;
            }
        }

        // K=2: third near vote crosses
        assert_eq!(transitions, 1);
        let actions: Vec<_> = monitor.reporter().events.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![ReportAction::Connected, ReportAction::Sit]);
        assert_eq!(monitor.reporter().events[1].timestamp, 300);
    }

    #[test]
    fn offline_never_reports() {
        let classifier = HysteresisClassifier::with_bound(near as Ping, 60.0, 2).unwrap();
        let tracker = LevelTracker::full(0, 10_000, 10_000).unwrap();
        let mut monitor = Monitor::new(classifier, tracker, (), Recorder::default(), LinkMode::Offline);

        monitor.start(0);
        for t in 1..=10 {
            monitor.tick(t * 100);
        }
        assert!(monitor.reporter().events.is_empty());
        assert_eq!(monitor.pending_reports(), 0);
    }

    #[test]
    fn failed_reports_wait_in_outbox() {
        let mut monitor = online(near, 0);
        monitor.reporter_mut().fail = true;
        monitor.start(0);
        for t in 1..=3 {
            monitor.tick(t * 100);
        }
        assert_eq!(monitor.pending_reports(), 2);
        assert!(monitor.stats().report_failures >= 2);

        monitor.reporter_mut().fail = false;
        monitor.tick(400);
        assert_eq!(monitor.pending_reports(), 0);
        assert_eq!(monitor.reporter().events.len(), 2);
        assert_eq!(monitor.stats().reports_sent, 2);
    }

    #[test]
    fn outbox_drops_oldest_when_full() {
        let mut monitor = online(near, 1);
        monitor.reporter_mut().fail = true;
        monitor.start(0);

        // Sitting drains the level, so a snapshot is queued every tick
        for t in 1..=(REPORT_OUTBOX_SIZE as u64 + 5) {
            monitor.tick(t * 100);
        }
        assert_eq!(monitor.pending_reports(), REPORT_OUTBOX_SIZE);
        assert!(monitor.stats().reports_dropped > 0);

        monitor.reporter_mut().fail = false;
        monitor.tick(100_000);
        // The connected event was the oldest and went first
        assert!(monitor.reporter().events.iter().all(|e| e.action != ReportAction::Connected));
    }

    #[test]
    fn overflow_keeps_transitions_over_snapshots() {
        let mut monitor = online(near, 1);
        monitor.reporter_mut().fail = true;
        monitor.start(0);

        // connected, sit at t=300, then one snapshot per tick
        for t in 1..=(REPORT_OUTBOX_SIZE as u64 + 10) {
            monitor.tick(t * 100);
        }

        assert_eq!(monitor.pending_reports(), REPORT_OUTBOX_SIZE);
        let queued: Vec<_> = monitor.outbox.iter().map(|e| e.action).collect();
        assert_eq!(queued[0], ReportAction::Sit);
        assert!(!queued.contains(&ReportAction::Connected));
        assert!(monitor.stats().reports_dropped > 1);
    }

    #[test]
    fn all_transition_outbox_drops_oldest() {
        let mut monitor = online(near, 0);
        for t in 0..(REPORT_OUTBOX_SIZE as u64 + 2) {
            monitor.enqueue(ReportEvent::transition(t, 50.0, t % 2 == 0));
        }
        assert_eq!(monitor.pending_reports(), REPORT_OUTBOX_SIZE);
        assert_eq!(monitor.outbox.front().map(|e| e.timestamp), Some(2));
        assert_eq!(monitor.stats().reports_dropped, 2);
    }

    #[test]
    fn start_rebases_the_tracker() {
        let classifier = HysteresisClassifier::with_bound(far as Ping, 60.0, 2).unwrap();
        let tracker = LevelTracker::new(50.0, 0, 10_000, 10_000).unwrap();
        let mut monitor = Monitor::offline(classifier, tracker, ());

        // Slow boot: the loop starts 5 s after the tracker was built
        monitor.start(5_000);
        assert_eq!(monitor.tracker().last_tick(), 5_000);

        monitor.tick(5_100);
        assert!((monitor.level() - 51.0).abs() < 1e-3);
    }

    #[test]
    fn snapshots_only_while_not_full() {
        // Standing with a full level: nothing periodic
        let mut monitor = online(far, 500);
        monitor.start(0);
        for t in 1..=20 {
            monitor.tick(t * 100);
        }
        assert_eq!(monitor.reporter().events.len(), 1);

        // Sitting drains: snapshots every 500 ms after the sit event
        let mut monitor = online(near, 500);
        monitor.start(0);
        for t in 1..=13 {
            monitor.tick(t * 100);
        }
        let actions: Vec<_> = monitor.reporter().events.iter().map(|e| (e.action, e.timestamp)).collect();
        assert_eq!(
            actions,
            vec![
                (ReportAction::Connected, 0),
                (ReportAction::Sit, 300),
                (ReportAction::Snapshot, 800),
                (ReportAction::Snapshot, 1300),
            ]
        );
    }

    #[test]
    fn status_follows_ticks() {
        static STATUS: SharedStatus = SharedStatus::full();

        let classifier = HysteresisClassifier::with_bound(near as Ping, 60.0, 2).unwrap();
        let tracker = LevelTracker::full(0, 1_000, 1_000).unwrap();
        let mut monitor = Monitor::offline(classifier, tracker, ()).with_status(&STATUS);

        monitor.start(0);
        for t in 1..=8 {
            monitor.tick(t * 100);
        }

        let snap = STATUS.snapshot();
        assert!(snap.occupied);
        assert!((snap.level - monitor.level()).abs() < 0.01);
    }
}
