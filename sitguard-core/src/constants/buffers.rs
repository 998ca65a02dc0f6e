//! Buffer Sizes
//!
//! Bounded storage used by the monitor. Everything here is a compile-time
//! capacity, nothing grows at runtime.

/// Capacity of the monitor's report outbox (events).
///
/// Holds events that could not be delivered while the reporter was failing.
/// When full the oldest snapshot or connected event is dropped; sit/stand
/// events are dropped only once nothing else is queued.
pub const REPORT_OUTBOX_SIZE: usize = 16;
