//! Report Events
//!
//! ## Overview
//!
//! Everything the monitor tells the outside world travels as a
//! [`ReportEvent`]: a fixed-size, `Copy` record that fits in the monitor's
//! outbox without allocation.
//!
//! ## Trigger Rules
//!
//! | Action      | When                                                   |
//! |-------------|--------------------------------------------------------|
//! | `connected` | Once, when the monitor starts in online mode           |
//! | `sit`       | Tick on which the debounced posture becomes sitting    |
//! | `stand`     | Tick on which the debounced posture becomes standing   |
//! | `snapshot`  | Every report interval while the level is below maximum |
//!
//! ## Wire Shape
//!
//! With the `serde` feature the event serializes as a flat object:
//!
//! ```text
//! { "timestamp": 123456, "level": 42.5, "occupied": true, "action": "sit" }
//! ```

use core::fmt;

use crate::time::Timestamp;

/// What caused an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum ReportAction {
    /// Monitor came up online
    Connected = 0,
    /// Subject sat down
    Sit = 1,
    /// Subject stood up
    Stand = 2,
    /// Periodic state while the level is not full
    Snapshot = 3,
}

impl ReportAction {
    /// Name used on the wire
    pub const fn name(&self) -> &'static str {
        match self {
            ReportAction::Connected => "connected",
            ReportAction::Sit => "sit",
            ReportAction::Stand => "stand",
            ReportAction::Snapshot => "snapshot",
        }
    }

    /// Action for a posture change into `occupied`
    pub const fn for_transition(occupied: bool) -> Self {
        if occupied {
            ReportAction::Sit
        } else {
            ReportAction::Stand
        }
    }

    /// Transitions are the events worth keeping when the outbox overflows
    pub const fn is_transition(&self) -> bool {
        matches!(self, ReportAction::Sit | ReportAction::Stand)
    }
}

impl fmt::Display for ReportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One report for the remote store
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportEvent {
    /// Device timestamp (ms since boot)
    pub timestamp: Timestamp,
    /// Health level in `[0, 100]`
    pub level: f32,
    /// Debounced posture at the time of the event
    pub occupied: bool,
    /// Why the event was emitted
    pub action: ReportAction,
}

impl ReportEvent {
    /// Startup event
    pub fn connected(timestamp: Timestamp, level: f32, occupied: bool) -> Self {
        Self { timestamp, level, occupied, action: ReportAction::Connected }
    }

    /// Posture change into `occupied`
    pub fn transition(timestamp: Timestamp, level: f32, occupied: bool) -> Self {
        Self {
            timestamp,
            level,
            occupied,
            action: ReportAction::for_transition(occupied),
        }
    }

    /// Periodic state
    pub fn snapshot(timestamp: Timestamp, level: f32, occupied: bool) -> Self {
        Self { timestamp, level, occupied, action: ReportAction::Snapshot }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ReportEvent {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{} t={} level={} occupied={}",
            self.action.name(),
            self.timestamp,
            self.level,
            self.occupied
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_size() {
        // Small enough to queue by value
        assert!(core::mem::size_of::<ReportEvent>() <= 24);
    }

    #[test]
    fn transition_action_follows_posture() {
        assert_eq!(ReportEvent::transition(10, 50.0, true).action, ReportAction::Sit);
        assert_eq!(ReportEvent::transition(10, 50.0, false).action, ReportAction::Stand);
        assert!(ReportAction::Sit.is_transition());
        assert!(!ReportAction::Snapshot.is_transition());
    }

    #[test]
    fn action_names() {
        assert_eq!(ReportAction::Connected.name(), "connected");
        assert_eq!(ReportAction::Stand.to_string(), "stand");
    }
}
