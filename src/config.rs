//! Engine configuration
//!
//! Every field has a default, so an empty document is a valid configuration.
//!
//! ```yaml
//! target_fps: 30
//! live_grace_window: 900      # seconds
//! dnf_threshold: 100000       # seconds
//! validation_tolerance_pct: 1.0
//! speed_options: [1, 2, 4, 8]
//! skip_step: 1.0              # seconds
//! feed_poll_interval: 5       # seconds
//! frame_rate: Native          # or !Max 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::types::UpdateRate;
use crate::yaml_utils::{parse_yaml, read_yaml_file};
use crate::{RaceError, Result};

/// Tunables for the replay engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ticks per second while playing
    pub target_fps: u32,
    /// How long after the start a completed race is still treated as live
    #[serde(with = "seconds")]
    pub live_grace_window: Duration,
    /// Final times above this many seconds are DNF
    pub dnf_threshold: f64,
    /// Relative difference below which local and authoritative times match
    pub validation_tolerance_pct: f64,
    /// Playback multipliers cycled by `cycle_speed`
    pub speed_options: Vec<f64>,
    /// Seconds moved by `skip_forward` / `skip_backward`
    pub skip_step: f64,
    #[serde(with = "seconds")]
    pub feed_poll_interval: Duration,
    /// Default rate for frame subscriptions
    pub frame_rate: UpdateRate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            live_grace_window: Duration::from_secs(15 * 60),
            dnf_threshold: 100_000.0,
            validation_tolerance_pct: 1.0,
            speed_options: vec![1.0, 2.0, 4.0, 8.0],
            skip_step: 1.0,
            feed_poll_interval: Duration::from_secs(5),
            frame_rate: UpdateRate::Native,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: EngineConfig = parse_yaml(yaml, "engine config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: EngineConfig = read_yaml_file(path.as_ref(), "engine config")?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.target_fps == 0 {
            return Err(RaceError::invalid_config("target_fps", "must be positive"));
        }
        if !(self.dnf_threshold.is_finite() && self.dnf_threshold > 0.0) {
            return Err(RaceError::invalid_config("dnf_threshold", "must be a positive number"));
        }
        if !(self.validation_tolerance_pct.is_finite() && self.validation_tolerance_pct >= 0.0) {
            return Err(RaceError::invalid_config(
                "validation_tolerance_pct",
                "must be zero or positive",
            ));
        }
        if self.speed_options.is_empty() {
            return Err(RaceError::invalid_config("speed_options", "must not be empty"));
        }
        if let Some(bad) = self.speed_options.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(RaceError::invalid_config(
                "speed_options",
                format!("every speed must be positive, got {bad}"),
            ));
        }
        if !(self.skip_step.is_finite() && self.skip_step > 0.0) {
            return Err(RaceError::invalid_config("skip_step", "must be positive"));
        }
        if self.feed_poll_interval.is_zero() {
            return Err(RaceError::invalid_config("feed_poll_interval", "must be positive"));
        }
        Ok(())
    }

    /// Seconds between ticks at the target rate.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }
}

/// Durations in config files are plain seconds.
mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.live_grace_window, Duration::from_secs(900));
        assert_eq!(config.tick_interval(), Duration::from_secs_f64(1.0 / 30.0));
    }

    #[test]
    fn partial_document_overrides_fields() {
        let yaml = "target_fps: 60\nlive_grace_window: 120\nframe_rate: !Max 10\nspeed_options: [0.5, 1, 16]\n";
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.live_grace_window, Duration::from_secs(120));
        assert_eq!(config.frame_rate, UpdateRate::Max(10));
        assert_eq!(config.speed_options, vec![0.5, 1.0, 16.0]);
        assert_eq!(config.dnf_threshold, 100_000.0);
    }

    #[test]
    fn invalid_values_name_their_field() {
        let cases = [
            ("target_fps: 0", "target_fps"),
            ("speed_options: []", "speed_options"),
            ("speed_options: [1, -2]", "speed_options"),
            ("validation_tolerance_pct: -1", "validation_tolerance_pct"),
            ("skip_step: 0", "skip_step"),
            ("feed_poll_interval: 0", "feed_poll_interval"),
            ("dnf_threshold: 0", "dnf_threshold"),
        ];
        for (yaml, field) in cases {
            match EngineConfig::from_yaml_str(yaml) {
                Err(RaceError::InvalidConfig { field: f, .. }) => assert_eq!(f, field, "{yaml}"),
                other => panic!("{yaml}: expected InvalidConfig, got {other:?}"),
            }
        }
    }

    #[test]
    fn negative_durations_fail_to_parse() {
        assert!(matches!(
            EngineConfig::from_yaml_str("live_grace_window: -5"),
            Err(RaceError::Parse { .. })
        ));
    }

    #[test]
    fn loads_from_file() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "skip_step: 2.5")?;
        let config = EngineConfig::load(file.path())?;
        assert_eq!(config.skip_step, 2.5);
        Ok(())
    }
}
