//! In-memory feed driven through a handle

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

use crate::provider::RaceFeed;
use crate::types::RaceSnapshot;
use crate::{RaceError, Result};

/// Feed serving whatever snapshot its [`FeedHandle`] last published.
#[derive(Debug)]
pub struct StaticFeed {
    current: watch::Receiver<Option<RaceSnapshot>>,
    poll_interval: Option<Duration>,
}

/// Publishes snapshots into a [`StaticFeed`]. Clones share the feed.
#[derive(Debug, Clone)]
pub struct FeedHandle {
    current: watch::Sender<Option<RaceSnapshot>>,
}

impl StaticFeed {
    /// Create a feed serving `snapshot` and a handle to update it.
    pub fn new(snapshot: RaceSnapshot) -> (Self, FeedHandle) {
        let (tx, rx) = watch::channel(Some(snapshot));
        (Self { current: rx, poll_interval: None }, FeedHandle { current: tx })
    }

    /// Override the engine's poll interval for this feed.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }
}

impl FeedHandle {
    /// Replace the served snapshot.
    pub fn publish(&self, snapshot: RaceSnapshot) {
        debug!(race_id = snapshot.race_id, status = ?snapshot.status, "Publishing snapshot");
        self.current.send_replace(Some(snapshot));
    }

    /// Modify the served snapshot in place. No-op while offline.
    pub fn update(&self, modify: impl FnOnce(&mut RaceSnapshot)) {
        self.current.send_modify(|current| {
            if let Some(snapshot) = current.as_mut() {
                modify(snapshot);
            }
        });
    }

    /// Make every poll fail until the next [`publish`](Self::publish).
    pub fn take_offline(&self) {
        self.current.send_replace(None);
    }
}

#[async_trait]
impl RaceFeed for StaticFeed {
    async fn snapshot(&mut self) -> Result<RaceSnapshot> {
        self.current
            .borrow()
            .clone()
            .ok_or_else(|| RaceError::feed_unavailable("feed is offline"))
    }

    fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{race_start, sample_snapshot};
    use crate::types::RaceStatus;

    #[tokio::test]
    async fn serves_the_latest_published_snapshot() {
        let (mut feed, handle) = StaticFeed::new(sample_snapshot(RaceStatus::Upcoming, Some(race_start())));
        assert_eq!(feed.snapshot().await.unwrap().status, RaceStatus::Upcoming);

        handle.update(|s| s.status = RaceStatus::InProgress);
        assert_eq!(feed.snapshot().await.unwrap().status, RaceStatus::InProgress);

        handle.take_offline();
        let err = feed.snapshot().await.unwrap_err();
        assert!(err.is_retryable());

        handle.update(|s| s.status = RaceStatus::Completed);
        assert!(feed.snapshot().await.is_err());

        handle.publish(sample_snapshot(RaceStatus::Completed, Some(race_start())));
        assert_eq!(feed.snapshot().await.unwrap().status, RaceStatus::Completed);
    }

    #[test]
    fn poll_interval_override() {
        let (feed, _handle) = StaticFeed::new(sample_snapshot(RaceStatus::Upcoming, None));
        assert_eq!(feed.poll_interval(), None);
        let feed = feed.with_poll_interval(Duration::from_millis(250));
        assert_eq!(feed.poll_interval(), Some(Duration::from_millis(250)));
    }
}
