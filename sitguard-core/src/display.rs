//! LED bar mapping
//!
//! The 0–100 level maps linearly onto a 10-segment bar, one segment per ten
//! points. An exactly empty level still lights half a segment so the bar never
//! looks switched off.

use crate::constants::level::{EMPTY_BAR_SEGMENTS, LED_BAR_SEGMENTS, LEVEL_MAX, LEVEL_MIN};

/// Maps a level onto bar segments
#[derive(Debug, Clone, Copy)]
pub struct BarLevel {
    segments: f32,
}

impl Default for BarLevel {
    fn default() -> Self {
        Self { segments: LED_BAR_SEGMENTS }
    }
}

impl BarLevel {
    /// Bar with a custom segment count
    pub fn with_segments(segments: u8) -> Self {
        Self { segments: f32::from(segments.max(1)) }
    }

    /// Lit segments for `level`
    ///
    /// Linear in the level; only an empty level maps to `EMPTY_BAR_SEGMENTS`.
    pub fn segments(&self, level: f32) -> f32 {
        let level = if level.is_nan() { LEVEL_MIN } else { level.clamp(LEVEL_MIN, LEVEL_MAX) };

        if level <= LEVEL_MIN {
            return EMPTY_BAR_SEGMENTS;
        }

        level / (LEVEL_MAX - LEVEL_MIN) * self.segments
    }
}
