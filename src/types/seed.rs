//! Race seeds and the per-segment values derived from them
//!
//! Every random-looking quantity in a race comes from the race seed through two
//! integer derivations:
//!
//! - segment seed: `seed + participant_index * 1000 + global_segment_index`
//! - jitter value: `(segment_seed * 31337 + participant_index * 7919 + lap * 12345) mod 1000`
//!
//! Only residues modulo 1000 are ever consumed, so both are computed in modular
//! arithmetic and never overflow regardless of the seed's magnitude.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const MODULUS: u64 = 1000;

/// Race-scoped seed, known to every viewer before the race starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RaceSeed(u128);

impl RaceSeed {
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u128 {
        self.0
    }

    /// Seed for one segment of one competitor's timeline:
    /// `seed + participant_index * 1000 + global_segment_index`, kept modulo 1000.
    ///
    /// The participant term is always a multiple of 1000, so only the seed and
    /// the segment index reach the residue.
    pub fn segment_seed(self, participant_index: u32, global_segment_index: u32) -> SegmentSeed {
        let seed = (self.0 % u128::from(MODULUS)) as u64;
        let participant = u64::from(participant_index) % MODULUS * (1000 % MODULUS);
        let segment = u64::from(global_segment_index) % MODULUS;
        let residue = (seed + participant + segment) % MODULUS;
        SegmentSeed { residue: residue as u32 }
    }
}

impl From<u64> for RaceSeed {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl fmt::Display for RaceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RaceSeed {
    type Err = crate::RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u128>()
            .map(RaceSeed)
            .map_err(|e| crate::RaceError::parse("race seed", e))
    }
}

// Seeds travel as decimal strings: YAML and JSON integers cannot hold the full range.
impl Serialize for RaceSeed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for RaceSeed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Int(value) => Ok(RaceSeed::from(value)),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Seed of a single segment, reduced modulo 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentSeed {
    residue: u32,
}

impl SegmentSeed {
    /// Reduce an explicit segment seed value.
    pub fn from_value(value: u128) -> Self {
        Self { residue: (value % MODULUS as u128) as u32 }
    }

    /// `segment_seed mod 1000`, in `0..1000`.
    pub fn residue(self) -> u32 {
        self.residue
    }

    /// `(segment_seed * 31337 + participant_index * 7919 + lap * 12345) mod 1000`.
    pub fn jitter_residue(self, participant_index: u32, lap: u32) -> u32 {
        let seed_term = u64::from(self.residue) * 31337;
        let participant_term = (u64::from(participant_index) % MODULUS) * 7919;
        let lap_term = (u64::from(lap) % MODULUS) * 12345;
        ((seed_term + participant_term + lap_term) % MODULUS) as u32
    }
}
