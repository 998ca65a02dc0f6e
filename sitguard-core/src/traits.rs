//! Core traits for the monitor's collaborators
//!
//! The core owns no hardware. Everything it touches comes in through one of
//! these seams, which keeps it testable with scripted fakes:
//!
//! - [`SampleSource`]: one distance reading per call
//! - [`OccupancyClassifier`]: debounced sitting/standing decision
//! - [`LevelDisplay`]: renders the level on an LED bar or similar
//! - [`Reporter`]: delivers [`ReportEvent`]s to a remote store

use core::convert::Infallible;
use core::fmt::Debug;

use crate::errors::SensorError;
use crate::events::ReportEvent;

/// Source of distance readings (centimeters)
///
/// Uses `nb::Result` like any embedded-hal style driver: `WouldBlock` means
/// the echo is not back yet, `Other` is a real failure. The classifiers treat
/// both as a neutral vote, so the source should not retry internally.
///
/// Closures work directly, which is handy for tests:
///
/// ```rust
/// use sitguard_core::traits::SampleSource;
///
/// let mut pings = [80.0_f32, 40.0].into_iter().cycle();
/// let mut source = move || -> nb::Result<f32, sitguard_core::SensorError> {
///     Ok(pings.next().unwrap_or(0.0))
/// };
/// assert_eq!(source.read_distance_cm(), Ok(80.0));
/// ```
pub trait SampleSource {
    /// Take one fresh reading
    fn read_distance_cm(&mut self) -> nb::Result<f32, SensorError>;
}

impl<F> SampleSource for F
where
    F: FnMut() -> nb::Result<f32, SensorError>,
{
    fn read_distance_cm(&mut self) -> nb::Result<f32, SensorError> {
        self()
    }
}

/// Debounced occupancy decision
///
/// `previous` is the value returned by the last call (or the initial state).
/// Implementations take their own samples and may hold the previous decision
/// while the evidence is inconclusive.
pub trait OccupancyClassifier {
    /// Decide whether the subject is currently sitting
    fn decide(&mut self, previous: bool) -> bool;

    /// Number of failed reads seen since construction
    fn failed_reads(&self) -> u32;
}

/// Sink that renders the level
pub trait LevelDisplay {
    /// Show the given number of lit segments (may be fractional)
    fn show(&mut self, segments: f32);
}

/// Headless deployments
impl LevelDisplay for () {
    fn show(&mut self, _segments: f32) {}
}

/// Sink for report events
///
/// Called synchronously from the control loop. An error leaves the event in
/// the monitor's outbox for the next tick.
pub trait Reporter {
    /// Delivery failure
    type Error: Debug;

    /// Deliver one event
    fn report(&mut self, event: &ReportEvent) -> Result<(), Self::Error>;
}

/// Reporter for offline mode; never called, never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReporter;

impl Reporter for NoReporter {
    type Error = Infallible;

    fn report(&mut self, _event: &ReportEvent) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    type Error = R::Error;

    fn report(&mut self, event: &ReportEvent) -> Result<(), Self::Error> {
        (**self).report(event)
    }
}
