//! Error types for the replay engine's I/O and control surface.
//!
//! The simulation core never fails: unsimulable competitors, unknown tracks,
//! validation mismatches and DNFs are all represented as data. `RaceError`
//! covers what sits around the core: loading configuration and track files,
//! talking to the race state feed, and rejecting playback commands that make
//! no sense in the current mode.
//!
//! ## Error Categories
//!
//! - **Feed Errors**: the race state feed could not produce a snapshot
//! - **File Errors**: track, config or snapshot files could not be read
//! - **Parse Errors**: YAML documents failed to decode
//! - **Config Errors**: values that decode but violate an invariant
//! - **Command Errors**: playback commands rejected by the state machine
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use raceline::RaceError;
//!
//! let error = RaceError::feed_unavailable("race canister unreachable");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T, E = RaceError> = std::result::Result<T, E>;

/// Main error type for the replay engine.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RaceError {
    #[error("Race feed unavailable: {reason}")]
    Feed {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Command '{command}' rejected: {reason}")]
    InvalidCommand { command: &'static str, reason: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Channel closed: {what}")]
    ChannelClosed { what: String },
}

impl RaceError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            RaceError::Feed { .. } => true,
            RaceError::Timeout { .. } => true,
            RaceError::File { .. } => false,
            RaceError::Parse { .. } => false,
            RaceError::InvalidConfig { .. } => false,
            RaceError::InvalidCommand { .. } => false,
            RaceError::ChannelClosed { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            RaceError::Feed { .. } => vec![
                "Check connectivity to the race state source",
                "Retry after the feed poll interval",
                "Fall back to the last known snapshot",
            ],
            RaceError::File { .. } => vec![
                "Check the file exists and is readable",
                "Verify the path is relative to the working directory",
            ],
            RaceError::Parse { .. } => vec![
                "Check the YAML document structure",
                "Verify field names match the expected schema",
            ],
            RaceError::InvalidConfig { .. } => vec![
                "Check the named field against its documented range",
                "Remove the field to fall back to its default",
            ],
            RaceError::InvalidCommand { .. } => vec![
                "Wait for the race to leave live mode",
                "Query the playback state before issuing commands",
            ],
            RaceError::Timeout { .. } => vec![
                "Increase the timeout duration",
                "Verify the race feed is responding",
            ],
            RaceError::ChannelClosed { .. } => vec![
                "Reopen the race view",
                "Check whether the view was dropped or cancelled",
            ],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        RaceError::File { path, source }
    }

    /// Helper constructor for feed failures.
    pub fn feed_unavailable(reason: impl Into<String>) -> Self {
        RaceError::Feed { reason: reason.into(), source: None }
    }

    /// Helper constructor for feed failures with source.
    pub fn feed_unavailable_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        RaceError::Feed { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for configuration errors.
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RaceError::InvalidConfig { field: field.into(), reason: reason.into() }
    }

    /// Helper constructor for rejected playback commands.
    pub fn invalid_command(command: &'static str, reason: impl Into<String>) -> Self {
        RaceError::InvalidCommand { command, reason: reason.into() }
    }

    /// Helper constructor for YAML decoding failures.
    pub fn parse(context: impl Into<String>, details: impl ToString) -> Self {
        RaceError::Parse { context: context.into(), details: details.to_string() }
    }

    /// Helper constructor for closed channels.
    pub fn channel_closed(what: impl Into<String>) -> Self {
        RaceError::ChannelClosed { what: what.into() }
    }
}

impl From<std::io::Error> for RaceError {
    fn from(err: std::io::Error) -> Self {
        RaceError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}
