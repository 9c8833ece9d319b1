//! Commentary events

use serde::{Deserialize, Serialize};

/// Kind of a commentary event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum RaceEventKind {
    Start,
    Overtake,
    Incident,
    LeadChange,
    Finish,
    Commentary,
}

/// A timestamped commentary record from the commentary feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RaceEvent {
    /// Elapsed race seconds at which the event happened
    pub timestamp: f64,
    pub kind: RaceEventKind,
    pub description: String,
}

impl RaceEvent {
    pub fn new(timestamp: f64, kind: RaceEventKind, description: impl Into<String>) -> Self {
        Self { timestamp, kind, description: description.into() }
    }
}

/// Ordered commentary list with "has this happened yet" filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Commentary {
    events: Vec<RaceEvent>,
}

impl Commentary {
    /// Build from events in any order; non-finite timestamps are dropped.
    pub fn new(mut events: Vec<RaceEvent>) -> Self {
        events.retain(|e| e.timestamp.is_finite());
        events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Self { events }
    }

    /// Events whose timestamp is at or before `current_time`.
    pub fn visible_events(&self, current_time: f64) -> &[RaceEvent] {
        let end = self.events.partition_point(|e| e.timestamp <= current_time);
        &self.events[..end]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
