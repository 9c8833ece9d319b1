//! Closed-form time to traverse one segment
//!
//! The formula is shared with the authoritative race source and must match it
//! operation for operation, including the final division by 10.

use crate::types::{EffectiveStats, Segment, SegmentSeed, Terrain};

/// Shortest time any segment can take, in seconds.
pub const MIN_SEGMENT_TIME: f64 = 0.1;

/// Game-balance divisor applied to every segment time.
const TIME_SCALE: f64 = 10.0;

/// Intermediate factors of one segment time calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTimeBreakdown {
    pub base_speed: f64,
    pub terrain_mod: f64,
    pub angle_mod: f64,
    pub momentum_mod: f64,
    pub difficulty_mod: f64,
    pub random_mod: f64,
    pub effective_speed: f64,
    /// Final time in seconds, at least [`MIN_SEGMENT_TIME`]
    pub time: f64,
}

fn terrain_mod(terrain: Terrain, stats: &EffectiveStats) -> f64 {
    match terrain {
        Terrain::RoughDebris => 1.0 + (100.0 - f64::from(stats.stability())) / 150.0,
        Terrain::LooseSand => 1.0 + (100.0 - f64::from(stats.power_core())) / 200.0,
        Terrain::PavedRoad => 1.0 + (100.0 - f64::from(stats.acceleration())) / 160.0,
    }
}

/// Compute every factor of the segment time.
pub fn segment_time_breakdown(
    segment: &Segment,
    stats: &EffectiveStats,
    previous_difficulty: f64,
    seed: SegmentSeed,
) -> SegmentTimeBreakdown {
    let base_speed = f64::from(stats.speed()).sqrt() * 7.5;
    let terrain_mod = terrain_mod(segment.terrain, stats);

    let angle_mod = if segment.angle > 0.0 {
        1.0 + segment.angle * (100.0 - f64::from(stats.power_core())) / 3000.0
    } else {
        1.0
    };

    let momentum_loss =
        if previous_difficulty > 1.0 { (previous_difficulty - 1.0) * 0.15 } else { 0.0 };
    let accel_recovery = f64::from(stats.acceleration()) / 140.0;
    let momentum_mod = 1.0 + momentum_loss * (1.0 - accel_recovery);

    let difficulty_mod = if segment.difficulty > 1.0 {
        segment.difficulty * (1.0 + (100.0 - f64::from(stats.stability())) / 300.0)
    } else {
        segment.difficulty
    };

    let random_mod = 0.90 + f64::from(seed.residue()) / 5000.0;

    let effective_speed = base_speed / (terrain_mod * angle_mod * difficulty_mod * momentum_mod);
    let raw = (segment.length / effective_speed) * random_mod / TIME_SCALE;
    // zero speed divides to infinity; timeline building rejects non-finite times
    let time = if raw.is_nan() { MIN_SEGMENT_TIME } else { raw.max(MIN_SEGMENT_TIME) };

    SegmentTimeBreakdown {
        base_speed,
        terrain_mod,
        angle_mod,
        momentum_mod,
        difficulty_mod,
        random_mod,
        effective_speed,
        time,
    }
}

/// Time in seconds to traverse `segment`.
pub fn segment_time(
    segment: &Segment,
    stats: &EffectiveStats,
    previous_difficulty: f64,
    seed: SegmentSeed,
) -> f64 {
    segment_time_breakdown(segment, stats, previous_difficulty, seed).time
}
