//! Per-competitor timelines
//!
//! A timeline is the ordered list of segment records a competitor produces
//! across every lap of a track. Timelines are built once and never mutated;
//! new inputs mean a new timeline.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::segment_time;
use crate::types::{EffectiveStats, RaceSeed, TrackTemplate};

/// Offset of the per-segment performance jitter.
const JITTER_BASE: f64 = 0.94;
/// Maps a jitter residue in `0..1000` onto `[0, 0.6)`.
const JITTER_DIVISOR: f64 = 1666.67;

/// Timing of one traversed segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct SegmentTimeRecord {
    /// Global index across all laps
    pub segment_index: u32,
    pub time: f64,
    pub cumulative_time: f64,
    pub distance: f64,
    pub cumulative_distance: f64,
}

/// Ordered segment records for one competitor.
///
/// An empty timeline means the competitor cannot be simulated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    records: Vec<SegmentTimeRecord>,
}

/// Jitter factor for a jitter residue, in `[0.94, 1.54)`.
pub fn performance_factor(jitter_residue: u32) -> f64 {
    JITTER_BASE + f64::from(jitter_residue) / JITTER_DIVISOR
}

fn all_positive_and_finite(records: &[SegmentTimeRecord]) -> bool {
    records.iter().all(|r| {
        r.time.is_finite() && r.time > 0.0 && r.distance.is_finite() && r.distance > 0.0
    })
}

impl Timeline {
    /// The timeline of a competitor that cannot be simulated.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Simulate a competitor across every lap of `track`.
    ///
    /// `previous_difficulty` starts at 1.0 and carries across lap boundaries.
    pub fn build(
        track: &TrackTemplate,
        seed: RaceSeed,
        participant_index: u32,
        stats: &EffectiveStats,
    ) -> Self {
        let mut records = Vec::with_capacity(track.segment_count());
        let mut cumulative_time = 0.0;
        let mut cumulative_distance = 0.0;
        let mut previous_difficulty = 1.0;

        for (lap, global_index, segment) in track.race_segments() {
            let segment_seed = seed.segment_seed(participant_index, global_index);
            let perf = performance_factor(segment_seed.jitter_residue(participant_index, lap));
            let time = segment_time(segment, stats, previous_difficulty, segment_seed) * perf;

            cumulative_time += time;
            cumulative_distance += segment.length;
            records.push(SegmentTimeRecord {
                segment_index: global_index,
                time,
                cumulative_time,
                distance: segment.length,
                cumulative_distance,
            });

            previous_difficulty = segment.difficulty;
        }

        if !all_positive_and_finite(&records) {
            warn!(participant_index, "Simulated timeline has non-finite segment times");
            return Self::empty();
        }
        Self { records }
    }

    /// Build from per-segment times supplied by the authoritative source.
    ///
    /// `times` must hold one finite positive value per race segment, otherwise
    /// the timeline is empty.
    pub fn from_segment_times(track: &TrackTemplate, times: &[f64]) -> Self {
        if times.len() != track.segment_count() {
            warn!(
                track_id = track.id,
                expected = track.segment_count(),
                got = times.len(),
                "Segment time count does not match track"
            );
            return Self::empty();
        }

        let mut records = Vec::with_capacity(times.len());
        let mut cumulative_time = 0.0;
        let mut cumulative_distance = 0.0;

        for ((_, global_index, segment), &time) in track.race_segments().zip(times) {
            cumulative_time += time;
            cumulative_distance += segment.length;
            records.push(SegmentTimeRecord {
                segment_index: global_index,
                time,
                cumulative_time,
                distance: segment.length,
                cumulative_distance,
            });
        }

        if !all_positive_and_finite(&records) {
            warn!(track_id = track.id, "Supplied segment times must be finite and positive");
            return Self::empty();
        }
        Self { records }
    }

    pub fn records(&self) -> &[SegmentTimeRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn last(&self) -> Option<&SegmentTimeRecord> {
        self.records.last()
    }

    /// Time at which the competitor crosses the line.
    pub fn final_time(&self) -> Option<f64> {
        self.last().map(|r| r.cumulative_time)
    }

    pub fn total_distance(&self) -> Option<f64> {
        self.last().map(|r| r.cumulative_distance)
    }

    /// Index of the first record whose cumulative time is at or after `time`.
    pub fn record_index_at(&self, time: f64) -> Option<usize> {
        let idx = self.records.partition_point(|r| r.cumulative_time < time);
        (idx < self.records.len()).then_some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Segment, Terrain};
    use proptest::prelude::*;

    fn single_segment_track(laps: u32) -> TrackTemplate {
        TrackTemplate {
            id: 99,
            name: "Worked".into(),
            description: String::new(),
            primary_terrain: Terrain::RoughDebris,
            laps,
            segments: vec![Segment::new(200.0, 0.0, Terrain::RoughDebris, 1.05)],
        }
    }

    #[test]
    fn worked_example_first_segment() {
        let track = single_segment_track(1);
        let stats = EffectiveStats::new(80, 70, 75, 65);
        let timeline = Timeline::build(&track, RaceSeed::new(12345), 0, &stats);

        assert_eq!(timeline.len(), 1);
        let first = timeline.records()[0];
        assert!((first.time - 0.440).abs() < 0.001, "got {}", first.time);
        assert!((performance_factor(265) - 1.099).abs() < 0.001);
        assert_eq!(first.cumulative_distance, 200.0);
    }

    #[test]
    fn difficulty_carries_across_laps() {
        let track = single_segment_track(2);
        let stats = EffectiveStats::new(80, 70, 75, 65);
        let timeline = Timeline::build(&track, RaceSeed::new(12345), 0, &stats);
        let records = timeline.records();

        // second lap starts with momentum loss from the 1.05 segment
        let momentum_free = segment_time(
            &track.segments[0],
            &stats,
            1.0,
            RaceSeed::new(12345).segment_seed(0, 1),
        );
        let carried = segment_time(
            &track.segments[0],
            &stats,
            1.05,
            RaceSeed::new(12345).segment_seed(0, 1),
        );
        let jitter = performance_factor(RaceSeed::new(12345).segment_seed(0, 1).jitter_residue(0, 1));
        assert_eq!(records[1].time, carried * jitter);
        assert!(carried > momentum_free);
        assert_eq!(records[1].segment_index, 1);
    }

    #[test]
    fn segment_times_from_source() {
        let track = single_segment_track(3);
        let timeline = Timeline::from_segment_times(&track, &[1.0, 2.0, 3.0]);
        assert_eq!(timeline.final_time(), Some(6.0));
        assert_eq!(timeline.total_distance(), Some(600.0));

        assert!(Timeline::from_segment_times(&track, &[1.0, 2.0]).is_empty());
        assert!(Timeline::from_segment_times(&track, &[1.0, f64::NAN, 3.0]).is_empty());
        assert!(Timeline::from_segment_times(&track, &[1.0, 0.0, 3.0]).is_empty());
    }

    #[test]
    fn zero_speed_is_unsimulable() {
        let track = single_segment_track(1);
        let stats = EffectiveStats::new(0, 50, 50, 50);
        assert!(Timeline::build(&track, RaceSeed::new(1), 0, &stats).is_empty());
    }

    #[test]
    fn record_lookup() {
        let track = single_segment_track(3);
        let timeline = Timeline::from_segment_times(&track, &[1.0, 2.0, 3.0]);
        assert_eq!(timeline.record_index_at(0.0), Some(0));
        assert_eq!(timeline.record_index_at(1.0), Some(0));
        assert_eq!(timeline.record_index_at(1.5), Some(1));
        assert_eq!(timeline.record_index_at(6.0), Some(2));
        assert_eq!(timeline.record_index_at(6.1), None);
    }

    proptest! {
        #[test]
        fn timelines_are_deterministic_and_monotonic(
            seed in any::<u64>(),
            participant in 0u32..16,
            laps in 1u32..4,
            lengths in prop::collection::vec(10.0f64..1500.0, 1..12),
            speed in 1u32..=100, stability in 0u32..=100,
            power_core in 0u32..=100, acceleration in 0u32..=100,
        ) {
            let segments = lengths
                .iter()
                .enumerate()
                .map(|(i, &len)| {
                    let terrain = Terrain::ALL[i % 3];
                    Segment::new(len, (i as f64 * 7.0) - 20.0, terrain, 0.8 + (i % 5) as f64 * 0.1)
                })
                .collect();
            let track = TrackTemplate {
                id: 1,
                name: "Prop".into(),
                description: String::new(),
                primary_terrain: Terrain::PavedRoad,
                laps,
                segments,
            };
            let stats = EffectiveStats::new(speed, stability, power_core, acceleration);

            let a = Timeline::build(&track, RaceSeed::from(seed), participant, &stats);
            let b = Timeline::build(&track, RaceSeed::from(seed), participant, &stats);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.len(), track.segment_count());

            for pair in a.records().windows(2) {
                prop_assert!(pair[0].cumulative_time < pair[1].cumulative_time);
                prop_assert!(pair[0].cumulative_distance < pair[1].cumulative_distance);
            }
        }
    }
}
