//! Pure per-competitor models: stat modifiers and segment timing.
//!
//! Nothing here allocates, logs or fails. Both functions are total over their
//! inputs so that any two callers with the same inputs agree bit for bit.

mod modifiers;
mod segment_time;

pub use modifiers::{FactionRule, Gate, Stat, resolve_stats};
pub use segment_time::{
    MIN_SEGMENT_TIME, SegmentTimeBreakdown, segment_time, segment_time_breakdown,
};
