//! Deterministic race outcome simulator and time-scrubbing replay engine.
//!
//! Raceline turns a track, a set of competitor stats and a race seed into a
//! reproducible timeline for every competitor, then plays those timelines
//! back: live against a remote start time, or as a scrubbable replay that is
//! reconciled against authoritative results.
//!
//! # Features
//!
//! - **Deterministic**: the same inputs produce bit-identical timelines everywhere
//! - **Scrubbable**: position at any elapsed time is a binary search plus interpolation
//! - **Live aware**: views of a running race converge on wall-clock elapsed time
//! - **Reconciled**: local final times are compared against authoritative ones
//!
//! # Layers
//!
//! - [`model`]: stat modifiers and the segment time formula
//! - [`sim`]: timelines, progression, ranking and validation (pure, synchronous)
//! - [`playback`]: the per-view state machine, driven by `tick`
//! - [`driver`] / [`connection`]: tokio tasks and the [`RaceView`] handle
//!
//! ## Example (replay)
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use raceline::{BuiltinTracks, EngineConfig, RaceView, UpdateRate, YamlFeed};
//!
//! #[tokio::main]
//! async fn main() -> raceline::Result<()> {
//!     let feed = YamlFeed::open("race.yaml")?;
//!     let view = RaceView::open(feed, BuiltinTracks::new(), EngineConfig::default()).await?;
//!     view.reset().await?;
//!     view.play().await?;
//!
//!     let mut frames = view.subscribe(UpdateRate::Max(10));
//!     while let Some(frame) = frames.next().await {
//!         for competitor in frame.leaderboard() {
//!             println!("{:?} {} {:.1}%", competitor.rank, competitor.competitor_id, competitor.percent);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;
mod yaml_utils;

// Simulation core
pub mod config;
pub mod model;
pub mod registry;
pub mod sim;

// Playback and async surface
pub mod connection;
pub mod driver;
pub mod playback;
pub mod provider;
pub mod providers;
pub mod stream;

// Core exports
pub use error::*;
pub use types::*;

pub use config::EngineConfig;
pub use model::{resolve_stats, segment_time};
pub use sim::{RaceTimelines, Timeline, ValidationStatus, ValidationSummary};

// Main API exports
pub use connection::RaceView;
pub use playback::{Clock, ManualClock, PlaybackCommand, PlaybackMachine, PlaybackState, SystemClock};
pub use provider::RaceFeed;
pub use providers::{FeedHandle, StaticFeed, YamlFeed};
pub use registry::{BuiltinTracks, TrackRegistry, YamlTracks};
