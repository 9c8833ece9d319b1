//! Feed trait for race state sources

use std::time::Duration;

use crate::Result;
use crate::types::RaceSnapshot;

/// Source of race state snapshots
///
/// Feeds abstract over where race state comes from (an in-memory handle, a
/// YAML file, a remote service). The driver polls them on an interval and
/// retries with backoff on errors, so an implementation only has to answer
/// "what does the race look like right now".
#[async_trait::async_trait]
pub trait RaceFeed: Send + 'static {
    /// Fetch the latest snapshot of the race
    ///
    /// Returns:
    /// - `Ok(snapshot)` - Current state of the race
    /// - `Err(e)` - The source could not be reached; the driver retries
    async fn snapshot(&mut self) -> Result<RaceSnapshot>;

    /// How often the feed wants to be polled
    ///
    /// `None` uses the engine's configured poll interval.
    fn poll_interval(&self) -> Option<Duration> {
        None
    }
}
