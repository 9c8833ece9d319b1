//! Core types for race data representation.
//!
//! This module provides the data structures shared by the simulation core, the
//! playback state machine and the async surface:
//!
//! - [`TrackTemplate`] and [`Segment`] describe a course
//! - [`RawStats`] / [`EffectiveStats`] hold competitor stats before and after modifiers
//! - [`RaceSeed`] derives every per-segment pseudo-random value
//! - [`RaceSnapshot`] is the payload of the race state feed
//! - [`RaceFrame`] is what subscribers receive on every tick
//!
//! ## Usage Example
//!
//! ```rust
//! use raceline::types::{RaceSeed, Segment, Terrain, TrackTemplate};
//!
//! let track = TrackTemplate {
//!     id: 1,
//!     name: "Test Loop".to_string(),
//!     description: String::new(),
//!     primary_terrain: Terrain::RoughDebris,
//!     laps: 2,
//!     segments: vec![Segment::new(200.0, 0.0, Terrain::RoughDebris, 1.05)],
//! };
//! assert_eq!(track.total_distance(), 400.0);
//!
//! let seed = RaceSeed::new(12345);
//! assert_eq!(seed.segment_seed(0, 0).residue(), 345);
//! ```

mod event;
pub(crate) mod faction;
mod frame;
mod race;
mod seed;
mod stats;
mod terrain;
mod track;
mod update_rate;

// Re-export all public types
pub use event::{Commentary, RaceEvent, RaceEventKind};
pub use faction::Faction;
pub use frame::{CompetitorState, CompetitorStatus, RaceFrame};
pub use race::{AuthoritativeResult, RaceEntry, RaceSnapshot, RaceStatus};
pub use seed::{RaceSeed, SegmentSeed};
pub use stats::{EffectiveStats, RawStats, STAT_CAP};
pub use terrain::Terrain;
pub use track::{Segment, TrackTemplate};
pub use update_rate::UpdateRate;
