//! Lock-free status snapshot
//!
//! The control loop is the only writer. Telemetry tasks, an HTTP status page
//! or an interrupt handler may read concurrently. Level and posture are packed
//! into one `AtomicU32` so a reader can never see the level of one tick with
//! the posture of another:
//!
//! ```text
//!  31                          1   0
//! ┌─────────────────────────────┬───┐
//! │ level in hundredths (0..10000)│ o │  o = occupied
//! └─────────────────────────────┴───┘
//! ```
//!
//! Only plain loads and stores are used, so this works on cores without
//! compare-and-swap.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::constants::level::{LEVEL_MAX, LEVEL_MIN};

const LEVEL_SCALE: f32 = 100.0;
const OCCUPIED_BIT: u32 = 1;
const FULL_STANDING: u32 = 10_000 << 1;

/// Consistent view of one tick's output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusSnapshot {
    /// Level rounded to hundredths
    pub level: f32,
    /// Debounced posture
    pub occupied: bool,
}

/// Single-writer, multi-reader status cell
#[derive(Debug)]
pub struct SharedStatus {
    packed: AtomicU32,
}

impl SharedStatus {
    /// Cell holding `level` and `occupied`
    pub fn new(level: f32, occupied: bool) -> Self {
        Self { packed: AtomicU32::new(pack(level, occupied)) }
    }

    /// Full level, standing; usable in a `static`
    pub const fn full() -> Self {
        Self { packed: AtomicU32::new(FULL_STANDING) }
    }

    /// Publish a new state (control loop only)
    pub fn publish(&self, level: f32, occupied: bool) {
        self.packed.store(pack(level, occupied), Ordering::Release);
    }

    /// Read the latest state
    pub fn snapshot(&self) -> StatusSnapshot {
        unpack(self.packed.load(Ordering::Acquire))
    }
}

impl Default for SharedStatus {
    fn default() -> Self {
        Self::full()
    }
}

fn pack(level: f32, occupied: bool) -> u32 {
    let level = if level.is_nan() { LEVEL_MIN } else { level.clamp(LEVEL_MIN, LEVEL_MAX) };
    let hundredths = libm::roundf(level * LEVEL_SCALE) as u32;
    (hundredths << 1) | u32::from(occupied)
}

fn unpack(packed: u32) -> StatusSnapshot {
    StatusSnapshot {
        level: (packed >> 1) as f32 / LEVEL_SCALE,
        occupied: packed & OCCUPIED_BIT != 0,
    }
}
