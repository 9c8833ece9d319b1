//! Feed reading a snapshot document from disk

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::provider::RaceFeed;
use crate::types::RaceSnapshot;
use crate::yaml_utils::read_yaml_file;
use crate::{RaceError, Result};

/// Feed that re-reads a YAML snapshot file on every poll.
///
/// Used for recorded races and fixtures; editing the file while a view is
/// open is picked up on the next poll.
#[derive(Debug, Clone)]
pub struct YamlFeed {
    path: PathBuf,
    poll_interval: Option<Duration>,
}

impl YamlFeed {
    /// Open a snapshot file, failing early if it does not parse.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot: RaceSnapshot = read_yaml_file(&path, "race snapshot")?;
        debug!(path = %path.display(), race_id = snapshot.race_id, "Opened snapshot file");
        Ok(Self { path, poll_interval: None })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RaceFeed for YamlFeed {
    async fn snapshot(&mut self) -> Result<RaceSnapshot> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_yaml_file::<RaceSnapshot>(&path, "race snapshot"))
            .await
            .map_err(|e| RaceError::feed_unavailable_with_source("snapshot reader task failed", Box::new(e)))?
    }

    fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::require_fixture;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use crate::types::{RaceStatus, Terrain};

    #[tokio::test]
    async fn reads_the_completed_fixture() -> anyhow::Result<()> {
        let path = require_fixture("completed_race.yaml")?;
        let mut feed = YamlFeed::open(&path)?;
        let snapshot = feed.snapshot().await?;

        assert_eq!(snapshot.status, RaceStatus::Completed);
        assert_eq!(snapshot.terrain, Terrain::RoughDebris);
        assert_eq!(snapshot.entries.len(), 4);
        assert!(snapshot.start_time.is_some());
        assert!(snapshot.results.iter().any(|r| r.is_dnf(100_000.0)));
        Ok(())
    }

    #[tokio::test]
    async fn missing_and_broken_files_are_errors() -> anyhow::Result<()> {
        assert!(matches!(YamlFeed::open("/nonexistent/race.yaml"), Err(RaceError::File { .. })));

        let mut file = NamedTempFile::new()?;
        file.write_all(b"raceId: [")?;
        assert!(matches!(YamlFeed::open(file.path()), Err(RaceError::Parse { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn picks_up_edits_between_polls() -> anyhow::Result<()> {
        let source = std::fs::read_to_string(require_fixture("completed_race.yaml")?)?;
        let file = NamedTempFile::new()?;
        std::fs::write(file.path(), &source)?;

        let mut feed = YamlFeed::open(file.path())?;
        assert_eq!(feed.snapshot().await?.status, RaceStatus::Completed);

        std::fs::write(file.path(), source.replace("status: Completed", "status: InProgress"))?;
        assert_eq!(feed.snapshot().await?.status, RaceStatus::InProgress);
        Ok(())
    }
}
