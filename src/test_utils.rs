//! Shared fixtures for unit tests, integration tests and benchmarks
//!
//! Canonical competitors and race snapshots built in code, plus lookup of the
//! YAML fixtures stored under `fixtures/`.

#![cfg(any(test, feature = "benchmark"))]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::registry::{BuiltinTracks, TrackRegistry};
use crate::sim::RaceTimelines;
use crate::types::{
    AuthoritativeResult, Faction, RaceEntry, RaceEvent, RaceEventKind, RaceSeed, RaceSnapshot,
    RaceStatus, RawStats, Terrain,
};

/// Race id used by every sample snapshot.
pub const SAMPLE_RACE_ID: u64 = 4242;

/// Track used by every sample snapshot (Scrap Mountain Circuit, 2 laps).
pub const SAMPLE_TRACK_ID: u32 = 1;

/// DNF threshold used by sample timelines.
pub const SAMPLE_DNF_THRESHOLD: f64 = 100_000.0;

/// Error returned when a required fixture cannot be located.
#[derive(Debug, Clone)]
pub struct FixtureError {
    message: String,
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FixtureError {}

/// Directory holding the YAML fixtures.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Resolve a fixture file by name, failing with a readable message if missing.
pub fn require_fixture(name: &str) -> Result<PathBuf, FixtureError> {
    let path = fixtures_dir().join(name);
    if path.exists() {
        Ok(path)
    } else {
        Err(FixtureError { message: format!("Missing fixture: {}", path.display()) })
    }
}

/// Fixed start time shared by sample races.
pub fn race_start() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(1_750_000_000)
}

pub fn sample_seed() -> RaceSeed {
    RaceSeed::new(987_654_321_012_345_678_901)
}

/// Four competitors covering faction, preferred terrain and condition rules.
pub fn sample_entries() -> Vec<RaceEntry> {
    vec![
        RaceEntry::new("bolt", RawStats::new(80, 60, 70, 75)).with_faction(Faction::Golden),
        RaceEntry::new("rust-bucket", RawStats::new(55, 80, 50, 60))
            .with_faction(Faction::Wild)
            .with_preferred_terrain(Terrain::RoughDebris),
        RaceEntry::new("dune-ghost", RawStats::new(70, 50, 65, 85))
            .with_faction(Faction::Bee)
            .with_condition(85),
        RaceEntry::new("scrap", RawStats::new(40, 40, 40, 40)),
    ]
}

pub fn sample_events() -> Vec<RaceEvent> {
    vec![
        RaceEvent::new(0.0, RaceEventKind::Start, "Engines roar off the line"),
        RaceEvent::new(3.5, RaceEventKind::Overtake, "bolt slips past dune-ghost on the climb"),
        RaceEvent::new(9.0, RaceEventKind::Incident, "scrap clips a debris pile"),
        RaceEvent::new(14.0, RaceEventKind::LeadChange, "rust-bucket takes the lead"),
    ]
}

/// Snapshot of the sample race with no results yet.
pub fn sample_snapshot(status: RaceStatus, start_time: Option<SystemTime>) -> RaceSnapshot {
    RaceSnapshot {
        race_id: SAMPLE_RACE_ID,
        track_id: SAMPLE_TRACK_ID,
        seed: sample_seed(),
        terrain: Terrain::RoughDebris,
        status,
        start_time,
        entries: sample_entries(),
        results: Vec::new(),
        events: sample_events(),
    }
}

/// Completed sample race whose authoritative times are the local ones
/// scaled by `drift` (1.0 for an exact match). The last competitor is a DNF.
pub fn completed_snapshot(drift: f64) -> RaceSnapshot {
    let mut snapshot = sample_snapshot(RaceStatus::Completed, Some(race_start()));
    let local = sample_timelines(&snapshot);

    let mut finishers: Vec<(String, f64)> = local
        .competitors()
        .iter()
        .take(snapshot.entries.len() - 1)
        .filter_map(|c| Some((c.competitor_id.clone(), c.timeline.final_time()? * drift)))
        .collect();
    finishers.sort_by(|a, b| a.1.total_cmp(&b.1));

    snapshot.results = finishers
        .into_iter()
        .enumerate()
        .map(|(idx, (id, time))| AuthoritativeResult::new(id, Some(time)).with_position(idx as u32 + 1))
        .collect();
    if let Some(last) = snapshot.entries.last() {
        let position = snapshot.results.len() as u32 + 1;
        snapshot.results.push(
            AuthoritativeResult::new(last.competitor_id.clone(), Some(SAMPLE_DNF_THRESHOLD + 1.0))
                .with_position(position),
        );
    }
    snapshot
}

/// Timelines for a snapshot on the built-in tracks.
pub fn sample_timelines(snapshot: &RaceSnapshot) -> Arc<RaceTimelines> {
    let track = BuiltinTracks::new().resolve(snapshot.track_id);
    Arc::new(RaceTimelines::from_snapshot(snapshot, track, SAMPLE_DNF_THRESHOLD))
}

/// A field of `competitors` generated entries for benchmarks.
pub fn large_field(competitors: usize) -> Vec<RaceEntry> {
    (0..competitors)
        .map(|i| {
            let stat = |offset: usize| 30 + ((i * 37 + offset * 11) % 70) as u32;
            let entry = RaceEntry::new(format!("racer-{i:04}"), RawStats::new(stat(0), stat(1), stat(2), stat(3)));
            match Faction::ALL.get(i % (Faction::ALL.len() + 1)) {
                Some(faction) => entry.with_faction(*faction),
                None => entry,
            }
        })
        .collect()
}
