//! Async handle on one race being watched

use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::driver::{Driver, DriverChannels};
use crate::playback::{Clock, PlaybackCommand, SystemClock};
use crate::provider::RaceFeed;
use crate::registry::TrackRegistry;
use crate::stream::ThrottleExt;
use crate::types::{RaceFrame, UpdateRate};
use crate::{RaceError, Result};

/// How long [`RaceView::open`] waits for the feed's first snapshot.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(10);

/// A running race view
///
/// Owns the driver tasks; dropping the view stops them.
pub struct RaceView {
    channels: DriverChannels,
    frame_rate: UpdateRate,
    tick_hz: f64,
}

impl RaceView {
    /// Open a view on the system clock.
    ///
    /// Waits for the first frame so subscriptions start with data.
    pub async fn open<F, R>(feed: F, registry: R, config: EngineConfig) -> Result<Self>
    where
        F: RaceFeed,
        R: TrackRegistry,
    {
        Self::open_with_clock(feed, registry, config, Arc::new(SystemClock), DEFAULT_OPEN_TIMEOUT).await
    }

    /// Open a view with an explicit clock and first-frame timeout.
    pub async fn open_with_clock<F, R>(
        feed: F,
        registry: R,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Result<Self>
    where
        F: RaceFeed,
        R: TrackRegistry,
    {
        config.validate()?;
        let frame_rate = config.frame_rate;
        let tick_hz = f64::from(config.target_fps);

        let channels = Driver::spawn(feed, registry, config, clock);

        let mut frames = channels.frames.clone();
        let first = tokio::time::timeout(timeout, async {
            frames.wait_for(|frame| frame.is_some()).await.map(|_| ())
        })
        .await;
        match first {
            Ok(Ok(_)) => {}
            Ok(Err(_)) => {
                channels.cancel.cancel();
                return Err(RaceError::channel_closed("race frames"));
            }
            Err(_) => {
                channels.cancel.cancel();
                return Err(RaceError::Timeout { duration: timeout });
            }
        }

        let view = Self { channels, frame_rate, tick_hz };
        if let Some(frame) = view.current_frame() {
            info!(race_id = frame.race_id, live = frame.live, state = ?frame.state, "Race view opened");
        }
        Ok(view)
    }

    /// Subscribe to frames at the configured default rate.
    pub fn frames(&self) -> impl Stream<Item = Arc<RaceFrame>> + 'static {
        self.subscribe(self.frame_rate)
    }

    /// Subscribe to frames
    ///
    /// Yields the current frame immediately. `UpdateRate::Max` keeps only the
    /// latest frame per interval.
    pub fn subscribe(&self, rate: UpdateRate) -> impl Stream<Item = Arc<RaceFrame>> + 'static {
        let frames = WatchStream::new(self.channels.frames.clone()).filter_map(|frame| async move { frame });

        match rate.throttle_interval(self.tick_hz) {
            None => frames.boxed(),
            Some(interval) => frames.throttle(interval).boxed(),
        }
    }

    /// Stream that yields once, when the race has been watched to completion.
    pub fn completed(&self) -> impl Stream<Item = ()> + 'static {
        WatchStream::new(self.channels.completed.clone())
            .filter_map(|done| async move { done.then_some(()) })
            .take(1)
    }

    pub fn is_completed(&self) -> bool {
        *self.channels.completed.borrow()
    }

    /// Most recent frame.
    pub fn current_frame(&self) -> Option<Arc<RaceFrame>> {
        self.channels.frames.borrow().clone()
    }

    /// Receiver for callers that prefer watch semantics to streams.
    pub fn watch(&self) -> watch::Receiver<Option<Arc<RaceFrame>>> {
        self.channels.frames.clone()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.channels.cancel.clone()
    }

    pub async fn play(&self) -> Result<()> {
        self.channels.send(PlaybackCommand::Play).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.channels.send(PlaybackCommand::Pause).await
    }

    pub async fn toggle(&self) -> Result<()> {
        self.channels.send(PlaybackCommand::Toggle).await
    }

    pub async fn reset(&self) -> Result<()> {
        self.channels.send(PlaybackCommand::Reset).await
    }

    pub async fn seek(&self, time: f64) -> Result<()> {
        self.channels.send(PlaybackCommand::Seek(time)).await
    }

    pub async fn skip_forward(&self) -> Result<()> {
        self.channels.send(PlaybackCommand::SkipForward).await
    }

    pub async fn skip_backward(&self) -> Result<()> {
        self.channels.send(PlaybackCommand::SkipBackward).await
    }

    pub async fn set_speed(&self, speed: f64) -> Result<()> {
        self.channels.send(PlaybackCommand::SetSpeed(speed)).await
    }

    pub async fn cycle_speed(&self) -> Result<()> {
        self.channels.send(PlaybackCommand::CycleSpeed).await
    }
}

impl Drop for RaceView {
    fn drop(&mut self) {
        debug!("Dropping race view");
        self.channels.cancel.cancel();
    }
}
