//! Track templates and their segments

use serde::{Deserialize, Serialize};

use super::Terrain;

/// One stretch of a track with fixed length, surface, grade and difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Segment {
    /// Length in meters
    pub length: f64,
    /// Grade in degrees, positive is uphill
    #[serde(default)]
    pub angle: f64,
    pub terrain: Terrain,
    /// Inherent hardness multiplier, typically 0.7 to 1.4
    pub difficulty: f64,
}

impl Segment {
    pub const fn new(length: f64, angle: f64, terrain: Terrain, difficulty: f64) -> Self {
        Self { length, angle, terrain, difficulty }
    }
}

/// Immutable track definition, looked up by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct TrackTemplate {
    #[serde(alias = "trackId")]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub primary_terrain: Terrain,
    pub laps: u32,
    pub segments: Vec<Segment>,
}

impl TrackTemplate {
    /// Flat single-segment track used when an id is not in the registry.
    pub fn fallback(id: u32) -> Self {
        Self {
            id,
            name: format!("Unknown Track {id}"),
            description: "Flat fallback circuit".to_string(),
            primary_terrain: Terrain::PavedRoad,
            laps: 1,
            segments: vec![Segment::new(1000.0, 0.0, Terrain::PavedRoad, 1.0)],
        }
    }

    /// Distance of one lap in meters.
    pub fn lap_distance(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    /// Distance of the whole race in meters.
    pub fn total_distance(&self) -> f64 {
        self.lap_distance() * f64::from(self.laps)
    }

    /// Number of segments traversed across all laps.
    pub fn segment_count(&self) -> usize {
        self.segments.len() * self.laps as usize
    }

    /// Iterate `(lap, global_index, segment)` in race order.
    pub fn race_segments(&self) -> impl Iterator<Item = (u32, u32, &Segment)> + '_ {
        let per_lap = self.segments.len() as u32;
        (0..self.laps).flat_map(move |lap| {
            self.segments
                .iter()
                .enumerate()
                .map(move |(idx, segment)| (lap, lap * per_lap + idx as u32, segment))
        })
    }
}
