//! Per-tick output of a race view

use serde::{Deserialize, Serialize};

use crate::playback::PlaybackState;
use crate::sim::ValidationSummary;

/// How a competitor is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum CompetitorStatus {
    /// On track, somewhere before the line
    Racing,
    /// Crossed the line at or before the current time
    Finished,
    /// Authoritative final time exceeds the DNF sentinel
    Dnf,
    /// No timeline could be built
    Unsimulable,
}

impl CompetitorStatus {
    /// Whether the competitor takes part in the live ranking.
    pub fn is_ranked(self) -> bool {
        matches!(self, CompetitorStatus::Racing | CompetitorStatus::Finished)
    }
}

/// Instantaneous state of one competitor, recomputed every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct CompetitorState {
    pub competitor_id: String,
    /// Registration order
    pub participant_index: u32,
    /// Meters covered
    pub distance: f64,
    /// Percent complete, 0 to 100
    pub percent: f64,
    /// Meters per second
    pub speed: f64,
    /// Global index of the segment being traversed
    pub current_segment: u32,
    /// Dense live rank starting at 1; `None` when not ranked
    pub rank: Option<u32>,
    pub status: CompetitorStatus,
    /// Locally computed final time
    pub local_final_time: Option<f64>,
}

impl CompetitorState {
    /// State for a competitor that is not shown on track.
    pub fn off_track(competitor_id: impl Into<String>, participant_index: u32, status: CompetitorStatus) -> Self {
        Self {
            competitor_id: competitor_id.into(),
            participant_index,
            distance: 0.0,
            percent: 0.0,
            speed: 0.0,
            current_segment: 0,
            rank: None,
            status,
            local_final_time: None,
        }
    }
}

/// Snapshot of a race view published on every tick.
///
/// This is the fundamental data unit that flows from the driver to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct RaceFrame {
    pub race_id: u64,
    /// Monotonic frame counter
    pub tick: u64,
    /// Elapsed race seconds being shown
    pub current_time: f64,
    pub max_time: f64,
    pub state: PlaybackState,
    pub speed: f64,
    pub live: bool,
    /// Whether the completion notification has fired
    pub completed: bool,
    /// Competitors in registration order
    pub competitors: Vec<CompetitorState>,
    /// Number of commentary events visible at `current_time`
    pub visible_events: u32,
    pub validation: ValidationSummary,
}

impl RaceFrame {
    /// Competitors ordered by live rank, unranked ones omitted.
    pub fn leaderboard(&self) -> Vec<&CompetitorState> {
        let mut ranked: Vec<&CompetitorState> =
            self.competitors.iter().filter(|c| c.rank.is_some()).collect();
        ranked.sort_by_key(|c| c.rank);
        ranked
    }

    pub fn competitor(&self, competitor_id: &str) -> Option<&CompetitorState> {
        self.competitors.iter().find(|c| c.competitor_id == competitor_id)
    }
}
