//! Stat modifier resolver
//!
//! Turns raw stats into effective stats for one race. Two steps run in order:
//!
//! 1. the competitor's faction rule, if its gate is open
//! 2. a flat +10% on every stat when the preferred terrain is the race terrain
//!
//! Every multiplication floors to an integer before the cap of 100 is applied.
//! Flooring after capping would differ by one point at the boundary.

use crate::types::{EffectiveStats, Faction, RawStats, STAT_CAP, Terrain};

const PREFERRED_TERRAIN_BONUS: f64 = 1.10;

/// One of the four stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Speed,
    Stability,
    PowerCore,
    Acceleration,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Speed, Stat::Stability, Stat::PowerCore, Stat::Acceleration];
}

/// Condition under which a faction rule applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    Always,
    /// Competitor condition at or above this percentage
    MinCondition(u8),
    /// Race terrain equals this terrain
    Terrain(Terrain),
}

/// Multipliers a faction applies to its stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactionRule {
    pub gate: Gate,
    pub multipliers: &'static [(Stat, f64)],
}

const fn all(multiplier: f64) -> [(Stat, f64); 4] {
    [
        (Stat::Speed, multiplier),
        (Stat::Stability, multiplier),
        (Stat::PowerCore, multiplier),
        (Stat::Acceleration, multiplier),
    ]
}

const ALL_15: [(Stat, f64); 4] = all(1.15);
const ALL_12: [(Stat, f64); 4] = all(1.12);
const ALL_10: [(Stat, f64); 4] = all(1.10);
const ALL_08: [(Stat, f64); 4] = all(1.08);
const ALL_06: [(Stat, f64); 4] = all(1.06);

impl Faction {
    /// Bonus rule for this faction; `None` for factions without one.
    pub fn rule(self) -> Option<FactionRule> {
        let rule = match self {
            Faction::UltimateMaster => FactionRule::new(Gate::Always, &ALL_15),
            Faction::Wild => {
                FactionRule::new(Gate::Always, &[(Stat::Acceleration, 1.20), (Stat::Stability, 0.90)])
            }
            Faction::Golden => FactionRule::new(Gate::MinCondition(90), &ALL_15),
            Faction::Ultimate => {
                FactionRule::new(Gate::Always, &[(Stat::Speed, 1.12), (Stat::Acceleration, 1.12)])
            }
            Faction::Blackhole => FactionRule::new(Gate::Terrain(Terrain::PavedRoad), &ALL_12),
            Faction::Dead => {
                FactionRule::new(Gate::Always, &[(Stat::PowerCore, 1.10), (Stat::Stability, 1.08)])
            }
            Faction::Master => {
                FactionRule::new(Gate::Always, &[(Stat::Speed, 1.12), (Stat::PowerCore, 1.08)])
            }
            Faction::Bee => FactionRule::new(Gate::Always, &[(Stat::Acceleration, 1.10)]),
            Faction::Box => FactionRule::new(Gate::Terrain(Terrain::RoughDebris), &ALL_10),
            Faction::Murder => {
                FactionRule::new(Gate::Always, &[(Stat::Speed, 1.08), (Stat::Acceleration, 1.08)])
            }
            Faction::Game => FactionRule::new(Gate::Terrain(Terrain::LooseSand), &ALL_08),
            Faction::Animal => FactionRule::new(Gate::Always, &ALL_06),
            Faction::Industrial => {
                FactionRule::new(Gate::Always, &[(Stat::PowerCore, 1.05), (Stat::Stability, 1.05)])
            }
            Faction::Food => return None,
        };
        Some(rule)
    }
}

impl FactionRule {
    const fn new(gate: Gate, multipliers: &'static [(Stat, f64)]) -> Self {
        Self { gate, multipliers }
    }

    fn is_open(&self, terrain: Terrain, condition: u8) -> bool {
        match self.gate {
            Gate::Always => true,
            Gate::MinCondition(min) => condition >= min,
            Gate::Terrain(required) => terrain == required,
        }
    }
}

/// Working copy of the four stats during resolution.
#[derive(Debug, Clone, Copy)]
struct StatBlock([u32; 4]);

impl StatBlock {
    fn from_raw(raw: RawStats) -> Self {
        Self([raw.speed, raw.stability, raw.power_core, raw.acceleration])
    }

    fn slot(stat: Stat) -> usize {
        match stat {
            Stat::Speed => 0,
            Stat::Stability => 1,
            Stat::PowerCore => 2,
            Stat::Acceleration => 3,
        }
    }

    fn scale(&mut self, stat: Stat, multiplier: f64) {
        let value = &mut self.0[Self::slot(stat)];
        *value = floor_scale(*value, multiplier);
    }

    fn cap(&mut self) {
        for value in &mut self.0 {
            *value = (*value).min(STAT_CAP);
        }
    }

    fn into_effective(self) -> EffectiveStats {
        let [speed, stability, power_core, acceleration] = self.0;
        EffectiveStats::new(speed, stability, power_core, acceleration)
    }
}

fn floor_scale(value: u32, multiplier: f64) -> u32 {
    (f64::from(value) * multiplier).floor() as u32
}

/// Resolve effective stats for a competitor racing on `terrain`.
///
/// Pure and total: an absent faction, a faction without a rule, or a closed
/// gate leave the stats untouched apart from the cap.
pub fn resolve_stats(
    raw: RawStats,
    faction: Option<Faction>,
    terrain: Terrain,
    preferred_terrain: Option<Terrain>,
    condition: u8,
) -> EffectiveStats {
    let mut stats = StatBlock::from_raw(raw);

    if let Some(rule) = faction.and_then(Faction::rule) {
        if rule.is_open(terrain, condition) {
            for &(stat, multiplier) in rule.multipliers {
                stats.scale(stat, multiplier);
            }
        }
    }
    stats.cap();

    if preferred_terrain == Some(terrain) {
        for stat in Stat::ALL {
            stats.scale(stat, PREFERRED_TERRAIN_BONUS);
        }
        stats.cap();
    }

    stats.into_effective()
}
