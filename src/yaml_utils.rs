//! YAML utilities for race data files
//!
//! Track, config and snapshot documents are often exported from other tools
//! and may carry stray control characters or a byte-order mark that break
//! `serde_yaml_ng`. This module cleans them without parsing.

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::{RaceError, Result};

/// Strip control characters (except `\n`, `\r`, `\t`) and a leading BOM.
///
/// Returns an error if nothing but whitespace is left.
pub fn clean_yaml(yaml: &str) -> Result<String> {
    let yaml = yaml.strip_prefix('\u{feff}').unwrap_or(yaml);
    let cleaned: String = yaml
        .chars()
        .filter(|ch| !matches!(ch, '\x00'..='\x08' | '\x0B'..='\x0C' | '\x0E'..='\x1F' | '\x7F'))
        .collect();

    if cleaned.trim().is_empty() {
        return Err(RaceError::parse("YAML preprocessing", "YAML is empty after preprocessing"));
    }

    Ok(cleaned)
}

/// Clean and decode a YAML document.
pub fn parse_yaml<T: DeserializeOwned>(yaml: &str, context: &str) -> Result<T> {
    let cleaned = clean_yaml(yaml)?;
    serde_yaml_ng::from_str(&cleaned).map_err(|e| RaceError::parse(context, e))
}

/// Read, clean and decode a YAML file.
pub fn read_yaml_file<T: DeserializeOwned>(path: &Path, context: &str) -> Result<T> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| RaceError::file_error(path.to_path_buf(), e))?;
    parse_yaml(&contents, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_control_characters() {
        let input = "name:\x00\x01 Dune\x02 Runner\x03";
        let result = clean_yaml(input).unwrap();
        assert_eq!(result, "name: Dune Runner");
    }

    #[test]
    fn keeps_valid_whitespace() {
        let input = "Key:\n\r\t  Value";
        let result = clean_yaml(input).unwrap();
        assert!(result.contains('\n'));
        assert!(result.contains('\r'));
        assert!(result.contains('\t'));
    }

    #[test]
    fn strips_byte_order_mark() {
        let result = clean_yaml("\u{feff}laps: 2").unwrap();
        assert_eq!(result, "laps: 2");
    }

    #[test]
    fn empty_after_cleaning_is_an_error() {
        assert!(matches!(clean_yaml("\x00\x01  \n"), Err(RaceError::Parse { .. })));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_yaml_file::<serde_yaml_ng::Value>(Path::new("/nonexistent/tracks.yaml"), "tracks")
            .unwrap_err();
        match err {
            RaceError::File { path, .. } => assert!(path.ends_with("tracks.yaml")),
            other => panic!("Expected File error, got {other:?}"),
        }
    }
}
