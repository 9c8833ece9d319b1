//! Live sub-mode rules
//!
//! A race is live when the source says it is in progress, or when it started
//! less than the grace window ago. The second condition keeps a just-finished
//! race watchable as if live instead of snapping to the end.

use std::time::{Duration, SystemTime};

use crate::types::RaceStatus;

/// Whether a race should be shown in live mode at `now`.
pub fn is_live(
    status: RaceStatus,
    start_time: Option<SystemTime>,
    now: SystemTime,
    grace_window: Duration,
) -> bool {
    match status {
        RaceStatus::InProgress => true,
        RaceStatus::Cancelled => false,
        RaceStatus::Upcoming | RaceStatus::Completed => start_time
            .and_then(|start| now.duration_since(start).ok())
            .is_some_and(|elapsed| elapsed < grace_window),
    }
}

/// Seconds since the race started, zero for unknown or future start times.
pub fn live_elapsed(start_time: Option<SystemTime>, now: SystemTime) -> f64 {
    start_time
        .and_then(|start| now.duration_since(start).ok())
        .map_or(0.0, |elapsed| elapsed.as_secs_f64())
}
