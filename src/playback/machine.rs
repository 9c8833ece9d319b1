//! Playback state machine for one race view
//!
//! The machine owns the only writer of `current_time`. Ticks are delta based
//! while replaying and wall-clock absolute in live mode, so independent
//! viewers of a live race converge without talking to each other.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, trace};

use super::clock::Clock;
use super::live::{is_live, live_elapsed};
use crate::config::EngineConfig;
use crate::sim::{RaceTimelines, ValidationSummary, validate};
use crate::types::{Commentary, RaceEvent, RaceFrame, RaceSnapshot, RaceStatus};
use crate::{RaceError, Result};

/// Coarse playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PlaybackState {
    /// Nothing has played yet
    Idle,
    Playing,
    Paused,
    /// Positioned at the end of the race
    Finished,
}

/// A user command addressed to a race view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Toggle,
    Reset,
    Seek(f64),
    SkipForward,
    SkipBackward,
    SetSpeed(f64),
    CycleSpeed,
}

/// Single-owner clock and state for one race view.
pub struct PlaybackMachine {
    race_id: u64,
    status: RaceStatus,
    start_time: Option<SystemTime>,
    timelines: Arc<RaceTimelines>,
    validation: ValidationSummary,
    commentary: Commentary,
    clock: Arc<dyn Clock>,

    grace_window: Duration,
    tolerance_pct: f64,
    skip_step: f64,
    speed_options: Vec<f64>,

    state: PlaybackState,
    current_time: f64,
    speed: f64,
    live: bool,
    completed: bool,
    ticks: u64,
}

impl std::fmt::Debug for PlaybackMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackMachine")
            .field("race_id", &self.race_id)
            .field("state", &self.state)
            .field("current_time", &self.current_time)
            .field("speed", &self.speed)
            .field("live", &self.live)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

impl PlaybackMachine {
    /// Open a view on a race.
    ///
    /// A live race starts playing at `now - start`. A race that has not
    /// started waits at zero. Anything else opens at the end without counting
    /// as watched.
    pub fn open(
        snapshot: &RaceSnapshot,
        timelines: Arc<RaceTimelines>,
        config: &EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let now = clock.now();
        let live = is_live(snapshot.status, snapshot.start_time, now, config.live_grace_window);
        let max_time = timelines.max_time();
        let (state, current_time) = if live {
            (PlaybackState::Playing, live_elapsed(snapshot.start_time, now).min(max_time))
        } else if snapshot.status == RaceStatus::Upcoming {
            (PlaybackState::Idle, 0.0)
        } else {
            (PlaybackState::Finished, max_time)
        };

        let validation = validate(&timelines, config.validation_tolerance_pct);
        let speed = config.speed_options.first().copied().unwrap_or(1.0);

        info!(
            race_id = snapshot.race_id,
            status = ?snapshot.status,
            live,
            ?state,
            current_time,
            max_time,
            competitors = timelines.competitors().len(),
            "Opened race view"
        );

        Self {
            race_id: snapshot.race_id,
            status: snapshot.status,
            start_time: snapshot.start_time,
            timelines,
            validation,
            commentary: Commentary::new(snapshot.events.clone()),
            clock,
            grace_window: config.live_grace_window,
            tolerance_pct: config.validation_tolerance_pct,
            skip_step: config.skip_step,
            speed_options: config.speed_options.clone(),
            state,
            current_time,
            speed,
            live,
            completed: false,
            ticks: 0,
        }
    }

    pub fn race_id(&self) -> u64 {
        self.race_id
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn max_time(&self) -> f64 {
        self.timelines.max_time()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Whether the completion notification has fired.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn timelines(&self) -> &Arc<RaceTimelines> {
        &self.timelines
    }

    pub fn validation(&self) -> &ValidationSummary {
        &self.validation
    }

    /// Commentary that has happened at the current time.
    pub fn visible_events(&self) -> &[RaceEvent] {
        self.commentary.visible_events(self.current_time)
    }

    /// Advance the clock by `dt` seconds of wall time.
    ///
    /// Returns `true` on the one tick that completes the race for this view.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.ticks += 1;
        self.refresh_live();

        let fired = if self.live {
            self.advance_live()
        } else if self.state == PlaybackState::Playing {
            let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
            self.advance_by(dt * self.speed)
        } else {
            false
        };

        trace!(tick = self.ticks, current_time = self.current_time, state = ?self.state, live = self.live, "Tick");
        fired
    }

    /// Apply a new remote status and start time from the feed.
    pub fn update_status(&mut self, status: RaceStatus, start_time: Option<SystemTime>) {
        if status != self.status || start_time != self.start_time {
            debug!(race_id = self.race_id, from = ?self.status, to = ?status, "Race status updated");
        }
        self.status = status;
        self.start_time = start_time;
        self.refresh_live();
    }

    /// Swap in timelines rebuilt from new inputs and re-run validation.
    pub fn replace_timelines(&mut self, timelines: Arc<RaceTimelines>) {
        self.timelines = timelines;
        self.validation = validate(&self.timelines, self.tolerance_pct);

        let max_time = self.max_time();
        if !self.live && self.state == PlaybackState::Finished {
            self.current_time = max_time;
        } else {
            self.current_time = self.current_time.min(max_time);
        }
        debug!(race_id = self.race_id, max_time, verified = self.validation.is_verified(), "Timelines replaced");
    }

    pub fn set_commentary(&mut self, events: Vec<RaceEvent>) {
        self.commentary = Commentary::new(events);
    }

    /// Dispatch a command.
    pub fn apply(&mut self, command: PlaybackCommand) -> Result<()> {
        match command {
            PlaybackCommand::Play => self.play(),
            PlaybackCommand::Pause => self.pause(),
            PlaybackCommand::Toggle => self.toggle(),
            PlaybackCommand::Reset => self.reset(),
            PlaybackCommand::Seek(time) => self.seek(time),
            PlaybackCommand::SkipForward => self.skip_forward(),
            PlaybackCommand::SkipBackward => self.skip_backward(),
            PlaybackCommand::SetSpeed(speed) => self.set_speed(speed),
            PlaybackCommand::CycleSpeed => self.cycle_speed().map(|_| ()),
        }
    }

    /// Start playing. At the end of the race this restarts from zero.
    pub fn play(&mut self) -> Result<()> {
        self.ensure_not_live("play")?;
        if self.state == PlaybackState::Playing {
            return Ok(());
        }
        if self.current_time >= self.max_time() {
            debug!(race_id = self.race_id, "Restarting from the beginning");
            self.current_time = 0.0;
        }
        self.transition(PlaybackState::Playing);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.ensure_not_live("pause")?;
        if self.state == PlaybackState::Playing {
            self.transition(PlaybackState::Paused);
        }
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<()> {
        if self.state == PlaybackState::Playing && !self.live { self.pause() } else { self.play() }
    }

    /// Back to zero, paused.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_not_live("reset")?;
        self.current_time = 0.0;
        self.transition(PlaybackState::Paused);
        Ok(())
    }

    /// Jump to `time`, clamped to the race length.
    pub fn seek(&mut self, time: f64) -> Result<()> {
        self.scrub("seek", time)
    }

    pub fn skip_forward(&mut self) -> Result<()> {
        self.scrub("skip_forward", self.current_time + self.skip_step)
    }

    pub fn skip_backward(&mut self) -> Result<()> {
        self.scrub("skip_backward", self.current_time - self.skip_step)
    }

    /// Set the playback multiplier. Ignored in live mode.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(RaceError::invalid_command("set_speed", format!("speed must be positive, got {speed}")));
        }
        if self.live {
            debug!(race_id = self.race_id, speed, "Ignoring speed change in live mode");
            return Ok(());
        }
        debug!(race_id = self.race_id, from = self.speed, to = speed, "Playback speed changed");
        self.speed = speed;
        Ok(())
    }

    /// Move to the next configured speed and return it.
    pub fn cycle_speed(&mut self) -> Result<f64> {
        let next = match self.speed_options.iter().position(|s| *s == self.speed) {
            Some(idx) => self.speed_options[(idx + 1) % self.speed_options.len()],
            None => self.speed_options.first().copied().unwrap_or(1.0),
        };
        self.set_speed(next)?;
        Ok(self.speed)
    }

    /// Snapshot of the view for subscribers.
    pub fn frame(&self) -> RaceFrame {
        RaceFrame {
            race_id: self.race_id,
            tick: self.ticks,
            current_time: self.current_time,
            max_time: self.max_time(),
            state: self.state,
            speed: self.speed,
            live: self.live,
            completed: self.completed,
            competitors: self.timelines.states_at(self.current_time),
            visible_events: self.visible_events().len() as u32,
            validation: self.validation.clone(),
        }
    }

    fn ensure_not_live(&self, command: &'static str) -> Result<()> {
        if self.live {
            Err(RaceError::invalid_command(command, "race is being shown live"))
        } else {
            Ok(())
        }
    }

    fn scrub(&mut self, command: &'static str, time: f64) -> Result<()> {
        self.ensure_not_live(command)?;
        if !time.is_finite() {
            return Err(RaceError::invalid_command(command, format!("time must be finite, got {time}")));
        }
        let max_time = self.max_time();
        self.current_time = time.clamp(0.0, max_time);
        debug!(race_id = self.race_id, command, current_time = self.current_time, "Scrubbed");

        match self.state {
            PlaybackState::Idle => self.transition(PlaybackState::Paused),
            PlaybackState::Finished if self.current_time < max_time => self.transition(PlaybackState::Paused),
            _ => {}
        }
        Ok(())
    }

    fn transition(&mut self, to: PlaybackState) {
        if self.state != to {
            debug!(race_id = self.race_id, from = ?self.state, ?to, "Playback state changed");
            self.state = to;
        }
    }

    fn refresh_live(&mut self) {
        let live = is_live(self.status, self.start_time, self.clock.now(), self.grace_window);
        match (self.live, live) {
            (false, true) => {
                info!(race_id = self.race_id, "Entered live mode");
                self.live = true;
                self.transition(PlaybackState::Playing);
            }
            (true, false) => {
                info!(race_id = self.race_id, completed = self.completed, "Left live mode");
                self.live = false;
                self.current_time = self.max_time();
                self.transition(PlaybackState::Finished);
            }
            _ => {}
        }
    }

    /// Follow the wall clock. Completion needs a real crossing: a view that
    /// opened already at the end settles on `Finished` without firing.
    fn advance_live(&mut self) -> bool {
        let elapsed = live_elapsed(self.start_time, self.clock.now());
        let max_time = self.max_time();
        if elapsed >= max_time {
            let crossed = self.current_time < max_time;
            self.current_time = max_time;
            if crossed {
                self.finish()
            } else {
                self.transition(PlaybackState::Finished);
                false
            }
        } else {
            self.current_time = elapsed;
            self.transition(PlaybackState::Playing);
            false
        }
    }

    fn advance_by(&mut self, delta: f64) -> bool {
        let max_time = self.max_time();
        let next = self.current_time + delta;
        if next >= max_time {
            self.current_time = max_time;
            self.finish()
        } else {
            self.current_time = next;
            false
        }
    }

    /// Enter `Finished`; true only the first time this view completes.
    fn finish(&mut self) -> bool {
        self.transition(PlaybackState::Finished);
        if self.completed {
            return false;
        }
        self.completed = true;
        info!(race_id = self.race_id, current_time = self.current_time, "Race watched to completion");
        true
    }
}
