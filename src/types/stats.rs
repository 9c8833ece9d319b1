//! Competitor stat blocks

use serde::{Deserialize, Serialize};

/// Upper bound of every stat.
pub const STAT_CAP: u32 = 100;

/// Stats as stored on the competitor, before faction or terrain modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct RawStats {
    pub speed: u32,
    pub stability: u32,
    pub power_core: u32,
    pub acceleration: u32,
}

impl RawStats {
    pub fn new(speed: u32, stability: u32, power_core: u32, acceleration: u32) -> Self {
        Self { speed, stability, power_core, acceleration }
    }
}

/// Stats after modifiers, each capped at [`STAT_CAP`].
///
/// Fields are private so a value outside `[0, 100]` can never be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase", from = "RawStats")]
pub struct EffectiveStats {
    speed: u32,
    stability: u32,
    power_core: u32,
    acceleration: u32,
}

impl EffectiveStats {
    /// Build effective stats, clamping each field to the cap.
    pub fn new(speed: u32, stability: u32, power_core: u32, acceleration: u32) -> Self {
        Self {
            speed: speed.min(STAT_CAP),
            stability: stability.min(STAT_CAP),
            power_core: power_core.min(STAT_CAP),
            acceleration: acceleration.min(STAT_CAP),
        }
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn stability(&self) -> u32 {
        self.stability
    }

    pub fn power_core(&self) -> u32 {
        self.power_core
    }

    pub fn acceleration(&self) -> u32 {
        self.acceleration
    }
}

/// Snapshot stats that already include modifiers are taken as-is, only capped.
impl From<RawStats> for EffectiveStats {
    fn from(raw: RawStats) -> Self {
        Self::new(raw.speed, raw.stability, raw.power_core, raw.acceleration)
    }
}
