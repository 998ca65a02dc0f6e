//! Shared fixtures for integration tests
//!
//! - Scripted distance sources, including failures
//! - Reporter and display doubles that record what they receive

#![allow(dead_code)]

use std::collections::VecDeque;

use sitguard_core::{LevelDisplay, ReportEvent, Reporter, SampleSource, SensorError};

/// Clearly in front of the sensor
pub const NEAR_CM: f32 = 30.0;
/// Clearly away from the desk
pub const FAR_CM: f32 = 200.0;
/// Default sitting threshold
pub const THRESHOLD_CM: f32 = 60.0;

/// One scripted ping
#[derive(Debug, Clone, Copy)]
pub enum Ping {
    Near,
    Far,
    Busy,
    Fault,
    Garbage,
}

impl Ping {
    fn reading(self) -> nb::Result<f32, SensorError> {
        match self {
            Ping::Near => Ok(NEAR_CM),
            Ping::Far => Ok(FAR_CM),
            Ping::Busy => Err(nb::Error::WouldBlock),
            Ping::Fault => Err(nb::Error::Other(SensorError::Timeout)),
            Ping::Garbage => Ok(f32::NAN),
        }
    }
}

/// Plays back pings in order, then repeats the last one forever
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: VecDeque<Ping>,
    last: Ping,
    pub reads: usize,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Ping>) -> Self {
        Self { script: script.into_iter().collect(), last: Ping::Far, reads: 0 }
    }

    /// `count` near pings followed by far pings
    pub fn near_then_far(count: usize) -> Self {
        Self::new(std::iter::repeat(Ping::Near).take(count).chain(std::iter::once(Ping::Far)))
    }

    /// The same ping forever
    pub fn constant(ping: Ping) -> Self {
        Self { script: VecDeque::new(), last: ping, reads: 0 }
    }
}

impl SampleSource for ScriptedSource {
    fn read_distance_cm(&mut self) -> nb::Result<f32, SensorError> {
        self.reads += 1;
        if let Some(ping) = self.script.pop_front() {
            self.last = ping;
        }
        self.last.reading()
    }
}

/// Plays back raw distances, `None` meaning a failed read
#[derive(Debug, Clone)]
pub struct DistanceSource {
    readings: VecDeque<Option<f32>>,
}

impl DistanceSource {
    pub fn new(readings: impl IntoIterator<Item = Option<f32>>) -> Self {
        Self { readings: readings.into_iter().collect() }
    }
}

impl SampleSource for DistanceSource {
    fn read_distance_cm(&mut self) -> nb::Result<f32, SensorError> {
        match self.readings.pop_front() {
            Some(Some(cm)) => Ok(cm),
            Some(None) => Err(nb::Error::Other(SensorError::OutOfRange)),
            None => Err(nb::Error::WouldBlock),
        }
    }
}

/// Reporter double that stores every accepted event
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<ReportEvent>,
    pub attempts: usize,
    pub failing: bool,
}

impl Reporter for RecordingReporter {
    type Error = &'static str;

    fn report(&mut self, event: &ReportEvent) -> Result<(), Self::Error> {
        self.attempts += 1;
        if self.failing {
            return Err("link down");
        }
        self.events.push(*event);
        Ok(())
    }
}

/// Display double that stores every frame
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub frames: Vec<f32>,
}

impl RecordingDisplay {
    pub fn last(&self) -> Option<f32> {
        self.frames.last().copied()
    }
}

impl LevelDisplay for RecordingDisplay {
    fn show(&mut self, segments: f32) {
        self.frames.push(segments);
    }
}

/// Approximate float comparison
pub fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
