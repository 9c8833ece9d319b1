//! Timelines for every competitor of one race

use std::sync::Arc;
use tracing::{debug, warn};

use super::progression::progress_at;
use super::ranking::assign_ranks;
use super::timeline::Timeline;
use crate::model::resolve_stats;
use crate::types::{
    AuthoritativeResult, CompetitorState, CompetitorStatus, EffectiveStats, RaceEntry, RaceSeed,
    RaceSnapshot, Terrain, TrackTemplate,
};

/// Elapsed time shown when nothing at all can be simulated.
pub const DEFAULT_MAX_TIME: f64 = 60.0;

/// One competitor's built timeline plus what the source said about it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorTimeline {
    pub competitor_id: String,
    pub participant_index: u32,
    /// Stats the timeline was simulated with, if any
    pub stats: Option<EffectiveStats>,
    pub timeline: Timeline,
    /// Final time computed locally from `stats`, independent of any
    /// authoritative segment times the timeline may have been played from
    pub simulated_final_time: Option<f64>,
    /// Authoritative final time, if the source has one
    pub server_final_time: Option<f64>,
    pub dnf: bool,
}

impl CompetitorTimeline {
    pub fn is_simulable(&self) -> bool {
        !self.timeline.is_empty()
    }

    /// State of this competitor at `current_time`, without a rank.
    pub fn state_at(&self, current_time: f64) -> CompetitorState {
        if self.dnf {
            return CompetitorState::off_track(&self.competitor_id, self.participant_index, CompetitorStatus::Dnf);
        }
        if !self.is_simulable() {
            return CompetitorState::off_track(
                &self.competitor_id,
                self.participant_index,
                CompetitorStatus::Unsimulable,
            );
        }

        let progress = progress_at(&self.timeline, current_time);
        CompetitorState {
            competitor_id: self.competitor_id.clone(),
            participant_index: self.participant_index,
            distance: progress.distance,
            percent: progress.percent,
            speed: progress.speed,
            current_segment: progress.current_segment,
            rank: None,
            status: if progress.finished { CompetitorStatus::Finished } else { CompetitorStatus::Racing },
            local_final_time: self.timeline.final_time(),
        }
    }
}

/// Immutable set of timelines for a race, shareable across viewers.
#[derive(Debug, Clone)]
pub struct RaceTimelines {
    track: Arc<TrackTemplate>,
    competitors: Vec<CompetitorTimeline>,
    max_time: f64,
}

/// Stats a competitor should be simulated with.
///
/// An authoritative snapshot wins over the entry's raw stats; a snapshot with
/// bonuses already applied skips the resolver.
fn simulation_stats(
    entry: Option<&RaceEntry>,
    result: Option<&AuthoritativeResult>,
    terrain: Terrain,
) -> Option<EffectiveStats> {
    let faction = entry.and_then(|e| e.faction);
    let preferred = entry.and_then(|e| e.preferred_terrain);
    let condition = entry.map_or(100, |e| e.condition);

    match result.and_then(|r| r.stats.map(|s| (s, r.bonuses_applied))) {
        Some((snapshot, true)) => Some(EffectiveStats::from(snapshot)),
        Some((snapshot, false)) => Some(resolve_stats(snapshot, faction, terrain, preferred, condition)),
        None => entry
            .and_then(|e| e.stats)
            .map(|raw| resolve_stats(raw, faction, terrain, preferred, condition)),
    }
}

impl RaceTimelines {
    /// Build every competitor's timeline once.
    ///
    /// Participant index is registration order in `entries`. Results for
    /// competitors without an entry are appended after the entries.
    pub fn build(
        track: Arc<TrackTemplate>,
        seed: RaceSeed,
        terrain: Terrain,
        entries: &[RaceEntry],
        results: &[AuthoritativeResult],
        dnf_threshold: f64,
    ) -> Self {
        let mut ids: Vec<&str> = entries.iter().map(|e| e.competitor_id.as_str()).collect();
        for result in results {
            if !ids.contains(&result.competitor_id.as_str()) {
                debug!(competitor_id = %result.competitor_id, "Result without a registered entry");
                ids.push(&result.competitor_id);
            }
        }

        let competitors: Vec<CompetitorTimeline> = ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| {
                let participant_index = index as u32;
                let entry = entries.iter().find(|e| e.competitor_id == id);
                let result = results.iter().find(|r| r.competitor_id == id);
                let stats = simulation_stats(entry, result, terrain);

                let simulated = stats.as_ref().map(|stats| Timeline::build(&track, seed, participant_index, stats));
                let simulated_final_time = simulated.as_ref().and_then(Timeline::final_time);

                let timeline = match (result.and_then(|r| r.segment_times.as_deref()), simulated) {
                    (Some(times), _) => Timeline::from_segment_times(&track, times),
                    (None, Some(simulated)) => simulated,
                    (None, None) => {
                        warn!(competitor_id = id, "Missing stats, competitor cannot be simulated");
                        Timeline::empty()
                    }
                };

                CompetitorTimeline {
                    competitor_id: id.to_string(),
                    participant_index,
                    stats,
                    timeline,
                    simulated_final_time,
                    server_final_time: result.and_then(|r| r.final_time),
                    dnf: result.is_some_and(|r| r.is_dnf(dnf_threshold)),
                }
            })
            .collect();

        let max_time = compute_max_time(&competitors, dnf_threshold);
        debug!(
            track_id = track.id,
            competitors = competitors.len(),
            simulable = competitors.iter().filter(|c| c.is_simulable()).count(),
            max_time,
            "Race timelines built"
        );

        Self { track, competitors, max_time }
    }

    /// Build from a feed snapshot against an already resolved track.
    pub fn from_snapshot(snapshot: &RaceSnapshot, track: Arc<TrackTemplate>, dnf_threshold: f64) -> Self {
        Self::build(
            track,
            snapshot.seed,
            snapshot.terrain,
            &snapshot.entries,
            &snapshot.results,
            dnf_threshold,
        )
    }

    pub fn track(&self) -> &Arc<TrackTemplate> {
        &self.track
    }

    /// Competitors in registration order.
    pub fn competitors(&self) -> &[CompetitorTimeline] {
        &self.competitors
    }

    pub fn get(&self, competitor_id: &str) -> Option<&CompetitorTimeline> {
        self.competitors.iter().find(|c| c.competitor_id == competitor_id)
    }

    /// Length of the race replay in seconds.
    ///
    /// The slowest simulable competitor's final time; failing that the slowest
    /// non-DNF authoritative time; failing that 60 seconds.
    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    /// Ranked state of every competitor at `current_time`, in registration order.
    pub fn states_at(&self, current_time: f64) -> Vec<CompetitorState> {
        let mut states: Vec<CompetitorState> =
            self.competitors.iter().map(|c| c.state_at(current_time)).collect();
        assign_ranks(&mut states);
        states
    }
}

fn compute_max_time(competitors: &[CompetitorTimeline], dnf_threshold: f64) -> f64 {
    let slowest_local = competitors
        .iter()
        .filter_map(|c| c.timeline.final_time())
        .fold(0.0_f64, f64::max);
    if slowest_local > 0.0 {
        return slowest_local;
    }

    let slowest_server = competitors
        .iter()
        .filter_map(|c| c.server_final_time)
        .filter(|t| t.is_finite() && *t <= dnf_threshold)
        .fold(0.0_f64, f64::max);
    if slowest_server > 0.0 { slowest_server } else { DEFAULT_MAX_TIME }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Faction, RawStats, Segment};

    fn sprint() -> Arc<TrackTemplate> {
        Arc::new(TrackTemplate {
            id: 3,
            name: "Sprint".into(),
            description: String::new(),
            primary_terrain: Terrain::PavedRoad,
            laps: 2,
            segments: vec![
                Segment::new(300.0, 0.0, Terrain::PavedRoad, 0.9),
                Segment::new(200.0, 5.0, Terrain::RoughDebris, 1.2),
            ],
        })
    }

    fn entry(id: &str, speed: u32) -> RaceEntry {
        RaceEntry::new(id, RawStats::new(speed, 60, 60, 60))
    }

    #[test]
    fn participant_index_follows_registration() {
        let entries = vec![entry("a", 70), entry("b", 80)];
        let results = vec![AuthoritativeResult::new("late", Some(20.0))];
        let timelines =
            RaceTimelines::build(sprint(), RaceSeed::new(9), Terrain::PavedRoad, &entries, &results, 100_000.0);

        let ids: Vec<(&str, u32)> = timelines
            .competitors()
            .iter()
            .map(|c| (c.competitor_id.as_str(), c.participant_index))
            .collect();
        assert_eq!(ids, vec![("a", 0), ("b", 1), ("late", 2)]);
        assert!(!timelines.get("late").unwrap().is_simulable());
    }

    #[test]
    fn participant_index_changes_the_timeline() {
        let entries = vec![entry("a", 70), entry("b", 70)];
        let timelines =
            RaceTimelines::build(sprint(), RaceSeed::new(9), Terrain::PavedRoad, &entries, &[], 100_000.0);
        assert_ne!(
            timelines.get("a").unwrap().timeline,
            timelines.get("b").unwrap().timeline
        );
    }

    #[test]
    fn snapshot_with_bonuses_skips_the_resolver() {
        let entries = vec![entry("a", 50).with_faction(Faction::UltimateMaster)];
        let mut applied = AuthoritativeResult::new("a", Some(30.0));
        applied.stats = Some(RawStats::new(50, 60, 60, 60));
        applied.bonuses_applied = true;

        let timelines = RaceTimelines::build(
            sprint(),
            RaceSeed::new(1),
            Terrain::PavedRoad,
            &entries,
            std::slice::from_ref(&applied),
            100_000.0,
        );
        assert_eq!(timelines.get("a").unwrap().stats, Some(EffectiveStats::new(50, 60, 60, 60)));

        applied.bonuses_applied = false;
        let resolved =
            RaceTimelines::build(sprint(), RaceSeed::new(1), Terrain::PavedRoad, &entries, &[applied], 100_000.0);
        assert_eq!(resolved.get("a").unwrap().stats, Some(EffectiveStats::new(57, 69, 69, 69)));
    }

    #[test]
    fn supplied_segment_times_replace_simulation() {
        let mut result = AuthoritativeResult::new("a", Some(10.0));
        result.segment_times = Some(vec![1.0, 2.0, 3.0, 4.0]);
        let timelines = RaceTimelines::build(
            sprint(),
            RaceSeed::new(1),
            Terrain::PavedRoad,
            &[entry("a", 70)],
            &[result],
            100_000.0,
        );
        let a = timelines.get("a").unwrap();
        assert_eq!(a.timeline.final_time(), Some(10.0));
        assert_eq!(timelines.max_time(), 10.0);

        // the locally simulated final time is still kept for reconciliation
        let simulated =
            RaceTimelines::build(sprint(), RaceSeed::new(1), Terrain::PavedRoad, &[entry("a", 70)], &[], 100_000.0);
        assert_eq!(a.simulated_final_time, simulated.get("a").unwrap().timeline.final_time());
        assert_ne!(a.simulated_final_time, Some(10.0));
    }

    #[test]
    fn max_time_fallbacks() {
        let no_stats = RaceEntry { stats: None, ..entry("a", 0) };
        let results = vec![
            AuthoritativeResult::new("a", Some(42.0)),
            AuthoritativeResult::new("b", Some(250_000.0)),
            AuthoritativeResult::new("c", None),
        ];
        let server_only = RaceTimelines::build(
            sprint(),
            RaceSeed::new(1),
            Terrain::PavedRoad,
            std::slice::from_ref(&no_stats),
            &results,
            100_000.0,
        );
        assert_eq!(server_only.max_time(), 42.0);

        let nothing =
            RaceTimelines::build(sprint(), RaceSeed::new(1), Terrain::PavedRoad, &[no_stats], &[], 100_000.0);
        assert_eq!(nothing.max_time(), DEFAULT_MAX_TIME);
    }

    #[test]
    fn states_mark_dnf_and_unsimulable() {
        let entries = vec![entry("racer", 80), RaceEntry { stats: None, ..entry("ghost", 0) }, entry("crashed", 90)];
        let results = vec![AuthoritativeResult::new("crashed", Some(999_999.0))];
        let timelines =
            RaceTimelines::build(sprint(), RaceSeed::new(77), Terrain::PavedRoad, &entries, &results, 100_000.0);

        let states = timelines.states_at(1.0);
        assert_eq!(states[0].status, CompetitorStatus::Racing);
        assert_eq!(states[0].rank, Some(1));
        assert_eq!(states[1].status, CompetitorStatus::Unsimulable);
        assert_eq!(states[1].rank, None);
        assert_eq!(states[2].status, CompetitorStatus::Dnf);
        assert_eq!(states[2].rank, None);
        assert_eq!(states[2].distance, 0.0);
    }
}
