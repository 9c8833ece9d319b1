//! Time-to-distance mapping for a single timeline

use std::f64::consts::PI;

use super::timeline::Timeline;

/// Amplitude of the cosmetic speed oscillation.
const SPEED_WOBBLE: f64 = 0.02;
/// Unfinished competitors never report a full 100%.
const UNFINISHED_PERCENT_CEILING: f64 = 100.0 - 1e-9;

/// Where a competitor is at a given elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub distance: f64,
    pub percent: f64,
    pub speed: f64,
    pub current_segment: u32,
    pub finished: bool,
}

impl Progress {
    const NONE: Progress =
        Progress { distance: 0.0, percent: 0.0, speed: 0.0, current_segment: 0, finished: false };
}

/// Position of a competitor on `timeline` at `current_time` seconds.
///
/// Negative times are treated as zero. An empty timeline yields zero progress.
pub fn progress_at(timeline: &Timeline, current_time: f64) -> Progress {
    let records = timeline.records();
    let Some(last) = records.last() else {
        return Progress::NONE;
    };
    let t = if current_time.is_nan() { 0.0 } else { current_time.max(0.0) };

    if t >= last.cumulative_time {
        return Progress {
            distance: last.cumulative_distance,
            percent: 100.0,
            speed: 0.0,
            current_segment: records.len() as u32,
            finished: true,
        };
    }

    let Some(idx) = timeline.record_index_at(t) else {
        return Progress::NONE;
    };
    let segment = &records[idx];
    let (previous_time, previous_distance) = match idx {
        0 => (0.0, 0.0),
        _ => (records[idx - 1].cumulative_time, records[idx - 1].cumulative_distance),
    };

    let fraction = ((t - previous_time) / segment.time).clamp(0.0, 1.0);
    let distance = previous_distance + segment.distance * fraction;
    let percent =
        (distance / last.cumulative_distance * 100.0).clamp(0.0, UNFINISHED_PERCENT_CEILING);

    let wobble = (fraction * PI * 1.5 + idx as f64).sin() * SPEED_WOBBLE;
    let speed = segment.distance / segment.time * (1.0 + wobble);

    Progress { distance, percent, speed, current_segment: idx as u32, finished: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Segment, Terrain, TrackTemplate};
    use proptest::prelude::*;

    fn track(laps: u32) -> TrackTemplate {
        TrackTemplate {
            id: 5,
            name: "Two Step".into(),
            description: String::new(),
            primary_terrain: Terrain::PavedRoad,
            laps,
            segments: vec![
                Segment::new(100.0, 0.0, Terrain::PavedRoad, 1.0),
                Segment::new(300.0, 0.0, Terrain::PavedRoad, 1.0),
            ],
        }
    }

    #[test]
    fn interpolates_within_segment() {
        let timeline = Timeline::from_segment_times(&track(1), &[10.0, 30.0]);

        let start = progress_at(&timeline, 0.0);
        assert_eq!(start.distance, 0.0);
        assert_eq!(start.current_segment, 0);

        let mid_first = progress_at(&timeline, 5.0);
        assert_eq!(mid_first.distance, 50.0);
        assert_eq!(mid_first.percent, 12.5);

        let boundary = progress_at(&timeline, 10.0);
        assert_eq!(boundary.current_segment, 0);
        assert_eq!(boundary.distance, 100.0);

        let mid_second = progress_at(&timeline, 25.0);
        assert_eq!(mid_second.current_segment, 1);
        assert_eq!(mid_second.distance, 250.0);
        assert!(!mid_second.finished);
    }

    #[test]
    fn finished_at_last_cumulative_time() {
        let timeline = Timeline::from_segment_times(&track(1), &[10.0, 30.0]);
        let done = progress_at(&timeline, 40.0);
        assert!(done.finished);
        assert_eq!(done.percent, 100.0);
        assert_eq!(done.distance, 400.0);
        assert_eq!(done.speed, 0.0);
        assert_eq!(done.current_segment, 2);
    }

    #[test]
    fn speed_wobble_is_bounded() {
        let timeline = Timeline::from_segment_times(&track(1), &[10.0, 30.0]);
        // both segments run at 10 m/s before the wobble
        let base = 10.0;
        for step in 0..40 {
            let p = progress_at(&timeline, step as f64);
            assert!(p.speed >= base * 0.98 - 1e-9 && p.speed <= base * 1.02 + 1e-9);
        }
    }

    #[test]
    fn empty_and_negative_inputs() {
        assert_eq!(progress_at(&Timeline::empty(), 12.0), Progress::NONE);
        let timeline = Timeline::from_segment_times(&track(1), &[10.0, 30.0]);
        assert_eq!(progress_at(&timeline, -3.0).distance, 0.0);
        assert_eq!(progress_at(&timeline, f64::NAN).distance, 0.0);
    }

    proptest! {
        #[test]
        fn progress_is_bounded_and_monotonic(
            times in prop::collection::vec(0.1f64..50.0, 4),
            a in -10.0f64..250.0,
            b in -10.0f64..250.0,
        ) {
            let timeline = Timeline::from_segment_times(&track(2), &times);
            let last = timeline.final_time().unwrap();
            let (early, late) = if a <= b { (a, b) } else { (b, a) };

            let p_early = progress_at(&timeline, early);
            let p_late = progress_at(&timeline, late);
            for p in [p_early, p_late] {
                prop_assert!((0.0..=100.0).contains(&p.percent));
            }
            prop_assert_eq!(p_late.percent == 100.0, late >= last);
            prop_assert_eq!(p_early.percent == 100.0, early >= last);
            prop_assert!(p_early.distance <= p_late.distance);
        }
    }
}
