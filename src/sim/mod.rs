//! Race simulation: timelines, progression, ranking and reconciliation.
//!
//! Data flows one way:
//!
//! ```text
//! resolve_stats -> segment_time -> Timeline::build -> RaceTimelines::states_at
//! ```
//!
//! Everything here is synchronous and pure. [`RaceTimelines`] is built once
//! per set of inputs and may be shared behind an `Arc` by any number of views.

mod progression;
mod race;
mod ranking;
mod standings;
mod timeline;
mod validation;

pub use progression::{Progress, progress_at};
pub use race::{CompetitorTimeline, DEFAULT_MAX_TIME, RaceTimelines};
pub use ranking::{assign_ranks, compare_standing};
pub use standings::{Standing, final_standings};
pub use timeline::{SegmentTimeRecord, Timeline, performance_factor};
pub use validation::{CompetitorValidation, ValidationStatus, ValidationSummary, validate};
