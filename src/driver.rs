//! Driver spawns and manages the tasks behind a race view

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::playback::{Clock, PlaybackCommand, PlaybackMachine, PlaybackState};
use crate::provider::RaceFeed;
use crate::registry::TrackRegistry;
use crate::sim::RaceTimelines;
use crate::types::{RaceFrame, RaceSnapshot};
use crate::{RaceError, Result};

/// First retry delay after a failed feed poll.
const FEED_BACKOFF_BASE: Duration = Duration::from_millis(250);
/// Upper bound on the retry delay.
const FEED_BACKOFF_MAX: Duration = Duration::from_secs(30);
/// Buffered commands before senders wait.
const COMMAND_BUFFER: usize = 32;

/// A command plus the channel its outcome is reported on.
#[derive(Debug)]
pub(crate) struct CommandRequest {
    pub command: PlaybackCommand,
    pub reply: oneshot::Sender<Result<()>>,
}

/// Result of spawning driver tasks
pub struct DriverChannels {
    /// Latest frame; `None` until the first snapshot arrives
    pub frames: watch::Receiver<Option<Arc<RaceFrame>>>,
    /// Flips to `true` once, when the view completes
    pub completed: watch::Receiver<bool>,
    pub(crate) commands: mpsc::Sender<CommandRequest>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Driver spawns the feed poller and the playback task
///
/// The poller owns the feed and publishes snapshots on a watch channel. The
/// playback task owns the state machine, ticks it at the target rate, applies
/// commands and snapshots, and publishes frames.
pub struct Driver;

impl Driver {
    pub fn spawn<F, R>(
        feed: F,
        registry: R,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> DriverChannels
    where
        F: RaceFeed,
        R: TrackRegistry,
    {
        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let (frame_tx, frame_rx) = watch::channel(None);
        let (completed_tx, completed_rx) = watch::channel(false);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let cancel = CancellationToken::new();

        let poll_interval = feed.poll_interval().unwrap_or(config.feed_poll_interval);
        tokio::spawn(Self::feed_task(feed, poll_interval, snapshot_tx, cancel.clone()));

        let task = PlaybackTask {
            registry,
            config,
            clock,
            snapshots: snapshot_rx,
            commands: command_rx,
            frames: frame_tx,
            completed: completed_tx,
            cancel: cancel.clone(),
        };
        tokio::spawn(task.run());

        DriverChannels { frames: frame_rx, completed: completed_rx, commands: command_tx, cancel }
    }

    /// Feed poller - polls on an interval, backing off on errors
    async fn feed_task<F: RaceFeed>(
        mut feed: F,
        poll_interval: Duration,
        snapshots: watch::Sender<Option<Arc<RaceSnapshot>>>,
        cancel: CancellationToken,
    ) {
        info!(?poll_interval, "Feed poller started");
        let mut polls = 0u64;
        let mut error_count = 0u32;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => break,
                result = feed.snapshot() => result,
            };
            polls += 1;

            let wait = match result {
                Ok(snapshot) => {
                    error_count = 0;
                    trace!(polls, race_id = snapshot.race_id, status = ?snapshot.status, "Polled feed");
                    let changed = snapshots.send_if_modified(|current| {
                        if current.as_deref() == Some(&snapshot) {
                            return false;
                        }
                        *current = Some(Arc::new(snapshot));
                        true
                    });
                    if changed {
                        debug!(polls, "Feed snapshot changed");
                    }
                    if snapshots.is_closed() {
                        debug!("Snapshot receiver dropped, shutting down");
                        break;
                    }
                    poll_interval
                }
                Err(e) => {
                    error_count += 1;
                    let backoff = backoff_delay(error_count);
                    warn!(error_count, ?backoff, error = %e, "Feed poll failed");
                    backoff
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
        }

        info!(polls, "Feed poller ended");
    }
}

/// Delay before the next poll after `error_count` consecutive failures.
fn backoff_delay(error_count: u32) -> Duration {
    FEED_BACKOFF_BASE.saturating_mul(1u32 << error_count.saturating_sub(1).min(16)).min(FEED_BACKOFF_MAX)
}

/// Observable parts of the machine; a frame is published when these change.
#[derive(PartialEq)]
struct ViewKey {
    state: PlaybackState,
    current_time: f64,
    max_time: f64,
    speed: f64,
    live: bool,
    completed: bool,
}

impl ViewKey {
    fn of(machine: &PlaybackMachine) -> Self {
        Self {
            state: machine.state(),
            current_time: machine.current_time(),
            max_time: machine.max_time(),
            speed: machine.speed(),
            live: machine.is_live(),
            completed: machine.is_completed(),
        }
    }
}

struct PlaybackTask<R> {
    registry: R,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    snapshots: watch::Receiver<Option<Arc<RaceSnapshot>>>,
    commands: mpsc::Receiver<CommandRequest>,
    frames: watch::Sender<Option<Arc<RaceFrame>>>,
    completed: watch::Sender<bool>,
    cancel: CancellationToken,
}

impl<R: TrackRegistry> PlaybackTask<R> {
    async fn run(mut self) {
        let Some(mut snapshot) = self.first_snapshot().await else {
            info!("Playback task cancelled before the first snapshot");
            return;
        };

        let mut machine = PlaybackMachine::open(
            &snapshot,
            self.build_timelines(&snapshot),
            &self.config,
            self.clock.clone(),
        );
        self.publish(&machine);

        // Every tick advances playback by one fixed frame; skipped ticks are lost
        let frame_step = self.config.tick_interval();
        let mut ticker = tokio::time::interval(frame_step);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut feed_alive = true;

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!(race_id = machine.race_id(), "Playback task cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    let before = ViewKey::of(&machine);
                    let fired = machine.tick(frame_step.as_secs_f64());
                    if fired {
                        self.completed.send_replace(true);
                    }
                    if before != ViewKey::of(&machine) && !self.publish(&machine) {
                        debug!("Frame receivers dropped, shutting down");
                        break;
                    }
                }
                request = self.commands.recv() => {
                    let Some(request) = request else {
                        debug!("Command senders dropped, shutting down");
                        break;
                    };
                    let result = machine.apply(request.command);
                    if let Err(e) = &result {
                        debug!(command = ?request.command, error = %e, "Command rejected");
                    }
                    self.publish(&machine);
                    let _ = request.reply.send(result);
                }
                changed = self.snapshots.changed(), if feed_alive => {
                    if changed.is_err() {
                        debug!("Feed poller ended; keeping the last snapshot");
                        feed_alive = false;
                        continue;
                    }
                    let next = self.snapshots.borrow_and_update().clone();
                    if let Some(next) = next {
                        self.apply_snapshot(&mut machine, &mut snapshot, next);
                        self.publish(&machine);
                    }
                }
            }
        }

        self.cancel.cancel();
        info!(race_id = machine.race_id(), completed = machine.is_completed(), "Playback task ended");
    }

    async fn first_snapshot(&mut self) -> Option<Arc<RaceSnapshot>> {
        loop {
            if let Some(snapshot) = self.snapshots.borrow_and_update().clone() {
                return Some(snapshot);
            }
            tokio::select! {
                _ = self.cancel.cancelled() => return None,
                changed = self.snapshots.changed() => changed.ok()?,
            }
        }
    }

    fn build_timelines(&self, snapshot: &RaceSnapshot) -> Arc<RaceTimelines> {
        let track = self.registry.resolve(snapshot.track_id);
        Arc::new(RaceTimelines::from_snapshot(snapshot, track, self.config.dnf_threshold))
    }

    fn apply_snapshot(
        &self,
        machine: &mut PlaybackMachine,
        current: &mut Arc<RaceSnapshot>,
        next: Arc<RaceSnapshot>,
    ) {
        if next.race_id != current.race_id {
            warn!(expected = current.race_id, got = next.race_id, "Ignoring snapshot for another race");
            return;
        }
        if !next.same_simulation_inputs(current) {
            debug!(race_id = next.race_id, "Simulation inputs changed, rebuilding timelines");
            machine.replace_timelines(self.build_timelines(&next));
        }
        if next.events != current.events {
            machine.set_commentary(next.events.clone());
        }
        machine.update_status(next.status, next.start_time);
        *current = next;
    }

    /// Publish the current frame; false once nobody is listening.
    fn publish(&self, machine: &PlaybackMachine) -> bool {
        self.frames.send(Some(Arc::new(machine.frame()))).is_ok()
    }
}

impl DriverChannels {
    /// Send a command and wait for the machine's verdict.
    pub(crate) async fn send(&self, command: PlaybackCommand) -> Result<()> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(CommandRequest { command, reply })
            .await
            .map_err(|_| RaceError::channel_closed("playback commands"))?;
        outcome.await.map_err(|_| RaceError::channel_closed("playback command reply"))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::ManualClock;
    use crate::providers::StaticFeed;
    use crate::registry::BuiltinTracks;
    use crate::test_utils::{completed_snapshot, race_start, sample_snapshot};
    use crate::types::RaceStatus;

    async fn first_frame(channels: &mut DriverChannels) -> Arc<RaceFrame> {
        loop {
            if let Some(frame) = channels.frames.borrow_and_update().clone() {
                return frame;
            }
            channels.frames.changed().await.unwrap();
        }
    }

    #[test]
    fn backoff_grows_and_saturates() {
        assert_eq!(backoff_delay(1), Duration::from_millis(250));
        assert_eq!(backoff_delay(2), Duration::from_millis(500));
        assert_eq!(backoff_delay(4), Duration::from_secs(2));
        assert_eq!(backoff_delay(12), FEED_BACKOFF_MAX);
        assert_eq!(backoff_delay(u32::MAX), FEED_BACKOFF_MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn replays_a_completed_race_to_the_end() {
        let clock = ManualClock::new(race_start() + Duration::from_secs(3600));
        let (feed, _handle) = StaticFeed::new(completed_snapshot(1.0));
        let mut channels = Driver::spawn(feed, BuiltinTracks::new(), EngineConfig::default(), Arc::new(clock));

        let frame = first_frame(&mut channels).await;
        assert_eq!(frame.state, PlaybackState::Finished);
        assert!(!frame.completed);
        assert!(frame.validation.is_verified());

        channels.send(PlaybackCommand::SetSpeed(8.0)).await.unwrap();
        channels.send(PlaybackCommand::Toggle).await.unwrap();
        assert_eq!(channels.frames.borrow().as_ref().unwrap().current_time, 0.0);

        channels.completed.wait_for(|done| *done).await.unwrap();
        let frame = channels.frames.borrow().clone().unwrap();
        assert_eq!(frame.state, PlaybackState::Finished);
        assert_eq!(frame.current_time, frame.max_time);
        channels.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn feed_updates_reach_the_view() {
        let clock = ManualClock::new(race_start() - Duration::from_secs(10));
        let (feed, handle) = StaticFeed::new(sample_snapshot(RaceStatus::Upcoming, Some(race_start())));
        let feed = feed.with_poll_interval(Duration::from_millis(100));
        let mut channels =
            Driver::spawn(feed, BuiltinTracks::new(), EngineConfig::default(), Arc::new(clock.clone()));

        assert_eq!(first_frame(&mut channels).await.state, PlaybackState::Idle);

        clock.set(race_start() + Duration::from_secs(1));
        handle.update(|s| s.status = RaceStatus::InProgress);
        channels.frames.wait_for(|f| f.as_ref().is_some_and(|f| f.live)).await.unwrap();

        let err = channels.send(PlaybackCommand::Seek(2.0)).await.unwrap_err();
        assert!(matches!(err, RaceError::InvalidCommand { command: "seek", .. }));
        channels.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn feed_errors_do_not_stop_playback() {
        let clock = ManualClock::new(race_start() + Duration::from_secs(3600));
        let (feed, handle) = StaticFeed::new(completed_snapshot(1.0));
        let feed = feed.with_poll_interval(Duration::from_millis(100));
        let mut channels = Driver::spawn(feed, BuiltinTracks::new(), EngineConfig::default(), Arc::new(clock));
        first_frame(&mut channels).await;

        handle.take_offline();
        channels.send(PlaybackCommand::Reset).await.unwrap();
        channels.send(PlaybackCommand::Play).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        let frame = channels.frames.borrow().clone().unwrap();
        assert!(frame.current_time > 0.0);
        assert_eq!(frame.competitors.len(), 4);

        handle.publish(completed_snapshot(1.5));
        channels
            .frames
            .wait_for(|f| f.as_ref().is_some_and(|f| !f.validation.is_verified()))
            .await
            .unwrap();
        channels.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn a_stalled_runtime_advances_one_frame_not_the_whole_gap() {
        let clock = ManualClock::new(race_start() + Duration::from_secs(3600));
        let (feed, _handle) = StaticFeed::new(completed_snapshot(1.0));
        let config = EngineConfig::default();
        let frame_step = config.tick_interval().as_secs_f64();
        let mut channels = Driver::spawn(feed, BuiltinTracks::new(), config, Arc::new(clock));
        first_frame(&mut channels).await;

        channels.send(PlaybackCommand::Reset).await.unwrap();
        channels.send(PlaybackCommand::Play).await.unwrap();
        let before = channels.frames.borrow_and_update().clone().unwrap().current_time;

        tokio::time::advance(Duration::from_secs(2)).await;
        channels.frames.changed().await.unwrap();
        let after = channels.frames.borrow().clone().unwrap().current_time;

        let step = after - before;
        assert!(step > 0.0 && step < 3.0 * frame_step, "advanced {step}s");
        channels.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_closes_the_command_channel() {
        let (feed, _handle) = StaticFeed::new(completed_snapshot(1.0));
        let mut channels =
            Driver::spawn(feed, BuiltinTracks::new(), EngineConfig::default(), Arc::new(crate::playback::SystemClock));
        first_frame(&mut channels).await;

        channels.cancel.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(matches!(
            channels.send(PlaybackCommand::Play).await,
            Err(RaceError::ChannelClosed { .. })
        ));
    }
}
