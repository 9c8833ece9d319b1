//! Live ranking
//!
//! Ordering rules between two ranked competitors:
//!
//! - both finished: final time ascending
//! - exactly one finished: final time ascending, using the unfinished
//!   competitor's eventual final time rather than its current progress
//! - neither finished: percent complete descending
//!
//! A finished competitor's final time is at or before the current time and an
//! unfinished one's is after it, so these rules form a total order.

use std::cmp::Ordering;

use crate::types::{CompetitorState, CompetitorStatus};

fn is_finished(state: &CompetitorState) -> bool {
    state.status == CompetitorStatus::Finished
}

fn final_time(state: &CompetitorState) -> f64 {
    state.local_final_time.unwrap_or(f64::INFINITY)
}

/// Compare two ranked competitors; `Less` means `a` is ahead.
pub fn compare_standing(a: &CompetitorState, b: &CompetitorState) -> Ordering {
    let ordering = match (is_finished(a), is_finished(b)) {
        (false, false) => b.percent.total_cmp(&a.percent),
        _ => final_time(a).total_cmp(&final_time(b)),
    };
    ordering.then(a.participant_index.cmp(&b.participant_index))
}

/// Assign dense ranks starting at 1 to every ranked competitor.
///
/// DNF and unsimulable competitors get no rank. Input order is preserved.
pub fn assign_ranks(states: &mut [CompetitorState]) {
    let mut order: Vec<usize> = (0..states.len()).filter(|&i| states[i].status.is_ranked()).collect();
    order.sort_by(|&a, &b| compare_standing(&states[a], &states[b]));

    for state in states.iter_mut() {
        state.rank = None;
    }
    for (position, idx) in order.into_iter().enumerate() {
        states[idx].rank = Some(position as u32 + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: &str, index: u32, status: CompetitorStatus, percent: f64, final_time: f64) -> CompetitorState {
        CompetitorState {
            competitor_id: id.to_string(),
            participant_index: index,
            distance: percent * 10.0,
            percent,
            speed: 0.0,
            current_segment: 0,
            rank: None,
            status,
            local_final_time: Some(final_time),
        }
    }

    #[test]
    fn finished_competitor_beats_faster_looking_unfinished_one() {
        // A finished in 50s; B is at 40s with an eventual 55s
        let mut states = vec![
            state("B", 0, CompetitorStatus::Racing, 95.0, 55.0),
            state("A", 1, CompetitorStatus::Finished, 100.0, 50.0),
        ];
        assign_ranks(&mut states);
        assert_eq!(states[1].rank, Some(1));
        assert_eq!(states[0].rank, Some(2));
    }

    #[test]
    fn finished_competitors_order_by_final_time() {
        let mut states = vec![
            state("slow", 0, CompetitorStatus::Finished, 100.0, 61.0),
            state("fast", 1, CompetitorStatus::Finished, 100.0, 48.5),
        ];
        assign_ranks(&mut states);
        assert_eq!(states[1].rank, Some(1));
        assert_eq!(states[0].rank, Some(2));
    }

    #[test]
    fn unfinished_competitors_order_by_percent() {
        let mut states = vec![
            state("behind", 0, CompetitorStatus::Racing, 30.0, 40.0),
            state("ahead", 1, CompetitorStatus::Racing, 45.0, 60.0),
        ];
        assign_ranks(&mut states);
        assert_eq!(states[1].rank, Some(1));
        assert_eq!(states[0].rank, Some(2));
    }

    #[test]
    fn off_track_competitors_are_not_ranked() {
        let mut states = vec![
            CompetitorState::off_track("dnf", 0, CompetitorStatus::Dnf),
            state("racer", 1, CompetitorStatus::Racing, 10.0, 70.0),
            CompetitorState::off_track("ghost", 2, CompetitorStatus::Unsimulable),
            state("winner", 3, CompetitorStatus::Finished, 100.0, 20.0),
        ];
        assign_ranks(&mut states);
        assert_eq!(states[0].rank, None);
        assert_eq!(states[2].rank, None);
        assert_eq!(states[3].rank, Some(1));
        assert_eq!(states[1].rank, Some(2));
    }

    #[test]
    fn ties_fall_back_to_registration_order() {
        let mut states = vec![
            state("second", 4, CompetitorStatus::Racing, 50.0, 70.0),
            state("first", 2, CompetitorStatus::Racing, 50.0, 70.0),
        ];
        assign_ranks(&mut states);
        assert_eq!(states[1].rank, Some(1));
        assert_eq!(states[0].rank, Some(2));
    }
}
