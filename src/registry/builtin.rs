//! The ten tracks shipped with the game

use std::collections::BTreeMap;
use std::sync::Arc;

use super::TrackRegistry;
use crate::types::Segment;
use crate::types::Terrain::{LooseSand, PavedRoad, RoughDebris};
use crate::types::{Terrain, TrackTemplate};

const fn seg(length: f64, angle: f64, terrain: Terrain, difficulty: f64) -> Segment {
    Segment::new(length, angle, terrain, difficulty)
}

fn templates() -> Vec<TrackTemplate> {
    vec![
        TrackTemplate {
            id: 1,
            name: "Scrap Mountain Circuit".to_string(),
            description: "Technical climb through unstable debris".to_string(),
            primary_terrain: RoughDebris,
            laps: 2,
            segments: vec![
                seg(500.0, 5.0, RoughDebris, 1.0),
                seg(400.0, 12.0, RoughDebris, 1.1),
                seg(300.0, 18.0, RoughDebris, 1.15),
                seg(350.0, -8.0, RoughDebris, 1.05),
                seg(250.0, 0.0, RoughDebris, 1.2),
                seg(400.0, 15.0, RoughDebris, 1.12),
                seg(300.0, -5.0, RoughDebris, 1.08),
                seg(200.0, 0.0, RoughDebris, 1.15),
                seg(350.0, 8.0, RoughDebris, 1.1),
                seg(450.0, 22.0, RoughDebris, 1.25),
                seg(500.0, -12.0, RoughDebris, 1.0),
                seg(400.0, -18.0, RoughDebris, 0.95),
                seg(350.0, -15.0, RoughDebris, 1.0),
                seg(300.0, -7.0, RoughDebris, 1.1),
                seg(250.0, -15.0, RoughDebris, 1.05),
            ],
        },
        TrackTemplate {
            id: 2,
            name: "Highway of the Dead".to_string(),
            description: "Rusted highways with occasional debris obstacles".to_string(),
            primary_terrain: PavedRoad,
            laps: 1,
            segments: vec![
                seg(800.0, 0.0, PavedRoad, 0.85),
                seg(700.0, 0.0, PavedRoad, 0.9),
                seg(600.0, -3.0, PavedRoad, 0.82),
                seg(500.0, -5.0, PavedRoad, 0.8),
                seg(400.0, 3.0, RoughDebris, 1.15),
                seg(500.0, 5.0, RoughDebris, 1.2),
                seg(600.0, 0.0, PavedRoad, 0.88),
                seg(700.0, 0.0, PavedRoad, 0.9),
                seg(500.0, 0.0, PavedRoad, 0.92),
                seg(450.0, 0.0, PavedRoad, 0.95),
                seg(550.0, 0.0, PavedRoad, 0.85),
                seg(400.0, 0.0, PavedRoad, 0.9),
            ],
        },
        TrackTemplate {
            id: 3,
            name: "Wasteland Gauntlet".to_string(),
            description: "Endurance test through deep sand".to_string(),
            primary_terrain: LooseSand,
            laps: 1,
            segments: vec![
                seg(1000.0, 0.0, LooseSand, 1.1),
                seg(800.0, 3.0, LooseSand, 1.15),
                seg(700.0, 8.0, LooseSand, 1.22),
                seg(900.0, 12.0, LooseSand, 1.25),
                seg(600.0, -5.0, LooseSand, 1.12),
                seg(800.0, 0.0, LooseSand, 1.18),
                seg(700.0, 0.0, LooseSand, 1.15),
                seg(650.0, -4.0, LooseSand, 1.08),
                seg(750.0, -8.0, LooseSand, 1.05),
                seg(900.0, 0.0, LooseSand, 1.2),
                seg(800.0, 5.0, LooseSand, 1.22),
                seg(700.0, 8.0, LooseSand, 1.25),
                seg(600.0, -10.0, LooseSand, 1.1),
                seg(500.0, -5.0, LooseSand, 1.08),
                seg(900.0, 0.0, LooseSand, 1.12),
                seg(700.0, 0.0, LooseSand, 1.1),
                seg(600.0, -4.0, LooseSand, 1.05),
            ],
        },
        TrackTemplate {
            id: 4,
            name: "Junkyard Sprint".to_string(),
            description: "Short aggressive circuit".to_string(),
            primary_terrain: RoughDebris,
            laps: 3,
            segments: vec![
                seg(200.0, 0.0, RoughDebris, 1.05),
                seg(150.0, 5.0, RoughDebris, 1.1),
                seg(180.0, 8.0, RoughDebris, 1.15),
                seg(160.0, 12.0, RoughDebris, 1.2),
                seg(140.0, -6.0, RoughDebris, 1.12),
                seg(170.0, -10.0, RoughDebris, 1.08),
                seg(150.0, -5.0, RoughDebris, 1.1),
                seg(180.0, 0.0, RoughDebris, 1.15),
                seg(160.0, -4.0, RoughDebris, 1.05),
            ],
        },
        TrackTemplate {
            id: 5,
            name: "Metal Mesa Loop".to_string(),
            description: "Mixed terrain balanced circuit".to_string(),
            primary_terrain: PavedRoad,
            laps: 2,
            segments: vec![
                seg(400.0, 0.0, PavedRoad, 0.92),
                seg(350.0, 0.0, PavedRoad, 0.95),
                seg(300.0, 3.0, PavedRoad, 0.98),
                seg(250.0, 8.0, RoughDebris, 1.12),
                seg(300.0, 12.0, RoughDebris, 1.18),
                seg(250.0, 15.0, RoughDebris, 1.22),
                seg(300.0, -8.0, PavedRoad, 0.88),
                seg(350.0, -10.0, PavedRoad, 0.85),
                seg(400.0, -5.0, LooseSand, 1.08),
                seg(350.0, 0.0, LooseSand, 1.12),
                seg(300.0, 0.0, LooseSand, 1.1),
                seg(250.0, -15.0, LooseSand, 1.05),
            ],
        },
        TrackTemplate {
            id: 6,
            name: "Dune Runner".to_string(),
            description: "Brutal marathon through endless dunes - pure power core test".to_string(),
            primary_terrain: LooseSand,
            laps: 1,
            segments: vec![
                seg(1200.0, 5.0, LooseSand, 1.18),
                seg(1100.0, 8.0, LooseSand, 1.22),
                seg(1000.0, 12.0, LooseSand, 1.28),
                seg(1300.0, 15.0, LooseSand, 1.32),
                seg(1200.0, 10.0, LooseSand, 1.25),
                seg(1100.0, 0.0, LooseSand, 1.2),
                seg(1000.0, -8.0, LooseSand, 1.15),
                seg(900.0, -12.0, LooseSand, 1.1),
                seg(1200.0, 0.0, LooseSand, 1.22),
                seg(1100.0, 6.0, LooseSand, 1.25),
                seg(1000.0, 10.0, LooseSand, 1.28),
                seg(900.0, 8.0, LooseSand, 1.2),
                seg(1300.0, 0.0, LooseSand, 1.18),
                seg(1200.0, -5.0, LooseSand, 1.12),
                seg(1000.0, -10.0, LooseSand, 1.08),
            ],
        },
        TrackTemplate {
            id: 7,
            name: "Rust Belt Rally".to_string(),
            description: "High-speed highway blast - acceleration and top speed critical".to_string(),
            primary_terrain: PavedRoad,
            laps: 1,
            segments: vec![
                seg(900.0, 0.0, PavedRoad, 0.82),
                seg(850.0, -2.0, PavedRoad, 0.78),
                seg(800.0, 0.0, PavedRoad, 0.8),
                seg(750.0, 0.0, PavedRoad, 0.85),
                seg(700.0, -4.0, PavedRoad, 0.76),
                seg(650.0, 0.0, PavedRoad, 0.88),
                seg(600.0, 0.0, PavedRoad, 0.9),
                seg(550.0, 0.0, PavedRoad, 0.85),
                seg(900.0, 0.0, PavedRoad, 0.82),
                seg(850.0, 0.0, PavedRoad, 0.8),
                seg(800.0, -3.0, PavedRoad, 0.78),
                seg(850.0, 0.0, PavedRoad, 0.83),
            ],
        },
        TrackTemplate {
            id: 8,
            name: "Debris Field Dash".to_string(),
            description: "Treacherous obstacle course favoring stability masters".to_string(),
            primary_terrain: RoughDebris,
            laps: 2,
            segments: vec![
                seg(300.0, 8.0, RoughDebris, 1.22),
                seg(350.0, 12.0, RoughDebris, 1.28),
                seg(280.0, 18.0, RoughDebris, 1.35),
                seg(320.0, -10.0, RoughDebris, 1.18),
                seg(400.0, 0.0, RoughDebris, 1.25),
                seg(350.0, 15.0, RoughDebris, 1.3),
                seg(300.0, 20.0, RoughDebris, 1.38),
                seg(280.0, -15.0, RoughDebris, 1.2),
                seg(320.0, -8.0, RoughDebris, 1.15),
                seg(350.0, 0.0, RoughDebris, 1.28),
                seg(300.0, 10.0, RoughDebris, 1.25),
            ],
        },
        TrackTemplate {
            id: 9,
            name: "Velocity Viaduct".to_string(),
            description: "Lightning-fast elevated highway section - pure acceleration".to_string(),
            primary_terrain: PavedRoad,
            laps: 3,
            segments: vec![
                seg(300.0, 0.0, PavedRoad, 0.8),
                seg(250.0, 0.0, PavedRoad, 0.78),
                seg(280.0, -5.0, PavedRoad, 0.75),
                seg(220.0, -8.0, PavedRoad, 0.72),
                seg(200.0, 0.0, PavedRoad, 0.85),
                seg(250.0, 0.0, PavedRoad, 0.82),
            ],
        },
        TrackTemplate {
            id: 10,
            name: "Sandstorm Circuit".to_string(),
            description: "Circular desert track with varying dune intensities".to_string(),
            primary_terrain: LooseSand,
            laps: 2,
            segments: vec![
                seg(600.0, 0.0, LooseSand, 1.15),
                seg(550.0, 5.0, LooseSand, 1.2),
                seg(500.0, 10.0, LooseSand, 1.25),
                seg(450.0, 12.0, LooseSand, 1.28),
                seg(500.0, 8.0, LooseSand, 1.22),
                seg(550.0, 0.0, LooseSand, 1.18),
                seg(600.0, -6.0, LooseSand, 1.12),
                seg(550.0, -10.0, LooseSand, 1.08),
                seg(500.0, -8.0, LooseSand, 1.1),
                seg(600.0, 0.0, LooseSand, 1.15),
            ],
        },
    ]
}

/// Registry of the built-in tracks, ids 1 to 10.
#[derive(Debug, Clone)]
pub struct BuiltinTracks {
    tracks: BTreeMap<u32, Arc<TrackTemplate>>,
}

impl BuiltinTracks {
    pub fn new() -> Self {
        let tracks = templates().into_iter().map(|t| (t.id, Arc::new(t))).collect();
        Self { tracks }
    }
}

impl Default for BuiltinTracks {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackRegistry for BuiltinTracks {
    fn track(&self, id: u32) -> Option<Arc<TrackTemplate>> {
        self.tracks.get(&id).cloned()
    }

    fn ids(&self) -> Vec<u32> {
        self.tracks.keys().copied().collect()
    }
}
