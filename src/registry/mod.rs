//! Track registries
//!
//! A registry maps a track id to an immutable [`TrackTemplate`]. Lookups never
//! fail from the caller's point of view: [`TrackRegistry::resolve`] degrades
//! an unknown id to a flat single-segment track.

mod builtin;
mod yaml;

use std::sync::Arc;
use tracing::warn;

use crate::types::TrackTemplate;
use crate::{RaceError, Result};

pub use builtin::BuiltinTracks;
pub use yaml::YamlTracks;

/// Source of track templates.
pub trait TrackRegistry: Send + Sync + 'static {
    /// Look up a track by id.
    fn track(&self, id: u32) -> Option<Arc<TrackTemplate>>;

    /// Every known id, ascending.
    fn ids(&self) -> Vec<u32>;

    /// Look up a track, falling back to [`TrackTemplate::fallback`] for unknown ids.
    fn resolve(&self, id: u32) -> Arc<TrackTemplate> {
        match self.track(id) {
            Some(track) => track,
            None => {
                warn!(track_id = id, "Unknown track, using flat fallback");
                Arc::new(TrackTemplate::fallback(id))
            }
        }
    }
}

impl<R: TrackRegistry + ?Sized> TrackRegistry for Arc<R> {
    fn track(&self, id: u32) -> Option<Arc<TrackTemplate>> {
        (**self).track(id)
    }

    fn ids(&self) -> Vec<u32> {
        (**self).ids()
    }
}

/// Check the structural invariants of a track template.
pub fn validate_track(track: &TrackTemplate) -> Result<()> {
    let field = |name: &str| format!("tracks[{}].{name}", track.id);

    if track.laps == 0 {
        return Err(RaceError::invalid_config(field("laps"), "must be at least 1"));
    }
    if track.segments.is_empty() {
        return Err(RaceError::invalid_config(field("segments"), "must not be empty"));
    }
    for (idx, segment) in track.segments.iter().enumerate() {
        if !(segment.length.is_finite() && segment.length > 0.0) {
            return Err(RaceError::invalid_config(
                field(&format!("segments[{idx}].length")),
                format!("must be positive, got {}", segment.length),
            ));
        }
        if !(segment.difficulty.is_finite() && segment.difficulty > 0.0) {
            return Err(RaceError::invalid_config(
                field(&format!("segments[{idx}].difficulty")),
                format!("must be positive, got {}", segment.difficulty),
            ));
        }
        if !segment.angle.is_finite() {
            return Err(RaceError::invalid_config(
                field(&format!("segments[{idx}].angle")),
                "must be finite",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Segment, Terrain};

    #[test]
    fn validation_rejects_broken_tracks() {
        let mut track = TrackTemplate::fallback(7);
        assert!(validate_track(&track).is_ok());

        track.laps = 0;
        assert!(matches!(validate_track(&track), Err(RaceError::InvalidConfig { .. })));

        track.laps = 1;
        track.segments.clear();
        assert!(validate_track(&track).is_err());

        track.segments.push(Segment::new(-5.0, 0.0, Terrain::LooseSand, 1.0));
        let err = validate_track(&track).unwrap_err();
        assert!(err.to_string().contains("segments[0].length"));

        track.segments[0] = Segment::new(5.0, 0.0, Terrain::LooseSand, 0.0);
        assert!(validate_track(&track).unwrap_err().to_string().contains("difficulty"));
    }

    #[test]
    fn shared_registries_resolve_through_arc() {
        let registry: Arc<dyn TrackRegistry> = Arc::new(BuiltinTracks::new());
        assert_eq!(registry.resolve(2).name, "Highway of the Dead");
        assert_eq!(registry.resolve(404).segments.len(), 1);
    }
}
