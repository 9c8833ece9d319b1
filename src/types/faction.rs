//! Competitor factions
//!
//! The remote race source tags every competitor with one of a fixed set of
//! faction names. Tags this crate does not know decode to `None` rather than
//! failing, so a new faction on the remote side only loses its bonus.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Faction tag carried by a competitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Faction {
    UltimateMaster,
    Wild,
    Golden,
    Ultimate,
    Blackhole,
    Dead,
    Master,
    Bee,
    Box,
    Murder,
    Game,
    Animal,
    Industrial,
    Food,
}

impl Faction {
    pub const ALL: [Faction; 14] = [
        Faction::UltimateMaster,
        Faction::Wild,
        Faction::Golden,
        Faction::Ultimate,
        Faction::Blackhole,
        Faction::Dead,
        Faction::Master,
        Faction::Bee,
        Faction::Box,
        Faction::Murder,
        Faction::Game,
        Faction::Animal,
        Faction::Industrial,
        Faction::Food,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Faction::UltimateMaster => "UltimateMaster",
            Faction::Wild => "Wild",
            Faction::Golden => "Golden",
            Faction::Ultimate => "Ultimate",
            Faction::Blackhole => "Blackhole",
            Faction::Dead => "Dead",
            Faction::Master => "Master",
            Faction::Bee => "Bee",
            Faction::Box => "Box",
            Faction::Murder => "Murder",
            Faction::Game => "Game",
            Faction::Animal => "Animal",
            Faction::Industrial => "Industrial",
            Faction::Food => "Food",
        }
    }

    /// Parse a remote tag, returning `None` for tags outside the known set.
    pub fn from_tag(tag: &str) -> Option<Faction> {
        let tag = tag.trim();
        Faction::ALL.into_iter().find(|faction| faction.name() == tag)
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Faction {
    type Err = crate::RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Faction::from_tag(s)
            .ok_or_else(|| crate::RaceError::parse("faction", format!("unknown faction '{s}'")))
    }
}

/// Serde helper for optional faction fields that tolerates unknown tags.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Faction>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.as_deref().and_then(Faction::from_tag))
}
