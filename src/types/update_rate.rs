//! Update rate control for frame subscriptions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Update rate for frame subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum UpdateRate {
    /// Every frame the driver produces (the target tick rate)
    #[default]
    Native,

    /// At most this many frames per second; latest frame wins
    Max(u32),
}

impl UpdateRate {
    /// Normalize against the tick rate. Zero or faster-than-source requests become `Native`.
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            UpdateRate::Native => UpdateRate::Native,
            UpdateRate::Max(0) => UpdateRate::Native,
            UpdateRate::Max(hz) if f64::from(hz) >= source_hz => UpdateRate::Native,
            UpdateRate::Max(hz) => UpdateRate::Max(hz),
        }
    }

    pub fn needs_throttle(self, source_hz: f64) -> bool {
        matches!(self.normalize(source_hz), UpdateRate::Max(_))
    }

    /// Interval between emitted frames, if throttled.
    pub fn throttle_interval(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / f64::from(hz))),
        }
    }
}
