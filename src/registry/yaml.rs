//! Track registry loaded from a YAML document

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::{TrackRegistry, validate_track};
use crate::types::TrackTemplate;
use crate::yaml_utils::{parse_yaml, read_yaml_file};
use crate::{RaceError, Result};

/// Tracks read from a YAML list of templates.
#[derive(Debug, Clone, Default)]
pub struct YamlTracks {
    tracks: BTreeMap<u32, Arc<TrackTemplate>>,
}

impl YamlTracks {
    /// Parse and validate a YAML list of track templates.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let templates: Vec<TrackTemplate> = parse_yaml(yaml, "track list")?;
        Self::from_templates(templates)
    }

    /// Load a YAML track list from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let templates: Vec<TrackTemplate> = read_yaml_file(path, "track list")?;
        let registry = Self::from_templates(templates)?;
        info!(path = %path.display(), tracks = registry.tracks.len(), "Loaded track registry");
        Ok(registry)
    }

    /// Validate templates and index them by id. Duplicate ids are rejected.
    pub fn from_templates(templates: Vec<TrackTemplate>) -> Result<Self> {
        let mut tracks = BTreeMap::new();
        for template in templates {
            validate_track(&template)?;
            let id = template.id;
            if tracks.insert(id, Arc::new(template)).is_some() {
                return Err(RaceError::invalid_config(format!("tracks[{id}]"), "duplicate track id"));
            }
        }
        Ok(Self { tracks })
    }
}

impl TrackRegistry for YamlTracks {
    fn track(&self, id: u32) -> Option<Arc<TrackTemplate>> {
        self.tracks.get(&id).cloned()
    }

    fn ids(&self) -> Vec<u32> {
        self.tracks.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Terrain;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TWO_TRACKS: &str = r#"
- id: 21
  name: Salt Flats
  primaryTerrain: LooseSand
  laps: 2
  segments:
    - { length: 400, angle: 0, terrain: LooseSand, difficulty: 1.0 }
    - { length: 250, angle: 6, terrain: WastelandSand, difficulty: 1.2 }
- trackId: 22
  name: Causeway
  description: Long straight
  primaryTerrain: PavedRoad
  laps: 1
  segments:
    - { length: 900, terrain: PavedRoad, difficulty: 0.8 }
"#;

    #[test]
    fn loads_and_indexes_tracks() {
        let registry = YamlTracks::from_yaml_str(TWO_TRACKS).unwrap();
        assert_eq!(registry.ids(), vec![21, 22]);

        let salt = registry.track(21).unwrap();
        assert_eq!(salt.segments[1].terrain, Terrain::LooseSand);
        assert_eq!(salt.total_distance(), 1300.0);

        let causeway = registry.track(22).unwrap();
        assert_eq!(causeway.segments[0].angle, 0.0);
        assert_eq!(causeway.description, "Long straight");
    }

    #[test]
    fn rejects_invalid_and_duplicate_tracks() {
        let zero_laps = TWO_TRACKS.replace("laps: 2", "laps: 0");
        assert!(matches!(
            YamlTracks::from_yaml_str(&zero_laps),
            Err(RaceError::InvalidConfig { .. })
        ));

        let duplicate = TWO_TRACKS.replace("trackId: 22", "trackId: 21");
        let err = YamlTracks::from_yaml_str(&duplicate).unwrap_err();
        assert!(err.to_string().contains("duplicate"));

        assert!(matches!(YamlTracks::from_yaml_str("- id: ["), Err(RaceError::Parse { .. })));
    }

    #[test]
    fn loads_from_disk() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(TWO_TRACKS.as_bytes())?;

        let registry = YamlTracks::load(file.path())?;
        assert_eq!(registry.resolve(22).name, "Causeway");
        assert_eq!(registry.resolve(99).name, "Unknown Track 99");
        Ok(())
    }

    #[test]
    fn bundled_fixture_is_valid() -> anyhow::Result<()> {
        let registry = YamlTracks::load(crate::test_utils::require_fixture("tracks.yaml")?)?;
        assert_eq!(registry.ids(), vec![101, 102]);

        let gantry = registry.resolve(102);
        assert_eq!(gantry.segment_count(), 9);
        assert_eq!(gantry.total_distance(), 2700.0);
        assert_eq!(gantry.description, "");
        Ok(())
    }
}
