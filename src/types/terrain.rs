//! Track surface types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Surface of a track segment.
///
/// Each terrain penalises a different stat. The remote race source still uses
/// the legacy surface names, which are accepted as aliases when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Terrain {
    /// Loose scrap and debris; stability-bound
    #[serde(alias = "ScrapHeaps")]
    RoughDebris,
    /// Deep sand; power-core-bound
    #[serde(alias = "WastelandSand")]
    LooseSand,
    /// Paved or metal road; acceleration-bound
    #[serde(alias = "MetalRoads")]
    PavedRoad,
}

impl Terrain {
    /// Every terrain, in declaration order.
    pub const ALL: [Terrain; 3] = [Terrain::RoughDebris, Terrain::LooseSand, Terrain::PavedRoad];

    /// Name used by the remote race source.
    pub fn remote_name(self) -> &'static str {
        match self {
            Terrain::RoughDebris => "ScrapHeaps",
            Terrain::LooseSand => "WastelandSand",
            Terrain::PavedRoad => "MetalRoads",
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Terrain::RoughDebris => "RoughDebris",
            Terrain::LooseSand => "LooseSand",
            Terrain::PavedRoad => "PavedRoad",
        };
        f.write_str(name)
    }
}

impl FromStr for Terrain {
    type Err = crate::RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "RoughDebris" | "ScrapHeaps" => Ok(Terrain::RoughDebris),
            "LooseSand" | "WastelandSand" => Ok(Terrain::LooseSand),
            "PavedRoad" | "MetalRoads" => Ok(Terrain::PavedRoad),
            other => Err(crate::RaceError::parse("terrain", format!("unknown terrain '{other}'"))),
        }
    }
}
