//! Race state as published by the remote race source

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use super::{Faction, RaceEvent, RaceSeed, RawStats, Terrain};

/// Remote lifecycle status of a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum RaceStatus {
    Upcoming,
    InProgress,
    Completed,
    Cancelled,
}

fn default_condition() -> u8 {
    100
}

/// A registered competitor. Registration order is the participant index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceEntry {
    pub competitor_id: String,
    /// Raw stats; absent when the source could not provide them
    #[serde(default)]
    pub stats: Option<RawStats>,
    #[serde(default, deserialize_with = "super::faction::deserialize_lenient")]
    pub faction: Option<Faction>,
    #[serde(default)]
    pub preferred_terrain: Option<Terrain>,
    /// Condition percentage, 0 to 100
    #[serde(default = "default_condition")]
    pub condition: u8,
}

impl RaceEntry {
    pub fn new(competitor_id: impl Into<String>, stats: RawStats) -> Self {
        Self {
            competitor_id: competitor_id.into(),
            stats: Some(stats),
            faction: None,
            preferred_terrain: None,
            condition: default_condition(),
        }
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = Some(faction);
        self
    }

    pub fn with_preferred_terrain(mut self, terrain: Terrain) -> Self {
        self.preferred_terrain = Some(terrain);
        self
    }

    pub fn with_condition(mut self, condition: u8) -> Self {
        self.condition = condition.min(100);
        self
    }
}

/// Trusted outcome for one competitor. Never altered locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthoritativeResult {
    pub competitor_id: String,
    /// Final time in seconds; `None` while the race is still running
    #[serde(default)]
    pub final_time: Option<f64>,
    #[serde(default)]
    pub position: Option<u32>,
    /// Stats snapshot taken by the source
    #[serde(default)]
    pub stats: Option<RawStats>,
    /// Whether `stats` already include faction and terrain bonuses
    #[serde(default)]
    pub bonuses_applied: bool,
    /// Per-segment times computed by the source, in race order
    #[serde(default)]
    pub segment_times: Option<Vec<f64>>,
}

impl AuthoritativeResult {
    pub fn new(competitor_id: impl Into<String>, final_time: Option<f64>) -> Self {
        Self {
            competitor_id: competitor_id.into(),
            final_time,
            position: None,
            stats: None,
            bonuses_applied: false,
            segment_times: None,
        }
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether the final time exceeds the DNF sentinel.
    pub fn is_dnf(&self, dnf_threshold: f64) -> bool {
        self.final_time.is_some_and(|t| t > dnf_threshold)
    }

    pub fn is_in_progress(&self) -> bool {
        self.final_time.is_none()
    }
}

/// Full payload of the race state feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSnapshot {
    pub race_id: u64,
    pub track_id: u32,
    pub seed: RaceSeed,
    /// Race-wide terrain used for faction gates and preferred terrain
    pub terrain: Terrain,
    pub status: RaceStatus,
    #[serde(default, with = "epoch_nanos")]
    pub start_time: Option<SystemTime>,
    #[serde(default)]
    pub entries: Vec<RaceEntry>,
    #[serde(default)]
    pub results: Vec<AuthoritativeResult>,
    #[serde(default)]
    pub events: Vec<RaceEvent>,
}

impl RaceSnapshot {
    /// Whether two snapshots would produce identical timelines.
    ///
    /// Status, start time and commentary can change without a rebuild.
    pub fn same_simulation_inputs(&self, other: &RaceSnapshot) -> bool {
        self.track_id == other.track_id
            && self.seed == other.seed
            && self.terrain == other.terrain
            && self.entries == other.entries
            && self.results == other.results
    }
}

/// Start timestamps travel as integer nanoseconds since the Unix epoch.
mod epoch_nanos {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S: Serializer>(value: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = value.map(|t| {
            t.duration_since(UNIX_EPOCH).map(|d| d.as_nanos() as u64).unwrap_or_default()
        });
        nanos.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<SystemTime>, D::Error> {
        let nanos = Option::<u64>::deserialize(deserializer)?;
        Ok(nanos.map(|n| UNIX_EPOCH + Duration::from_nanos(n)))
    }
}
