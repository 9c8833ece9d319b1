//! Reconciliation of local final times against authoritative ones
//!
//! A mismatch is never an error: it is reported with its magnitude and
//! playback carries on regardless.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::race::RaceTimelines;

/// Comparison of one competitor's final times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct CompetitorValidation {
    pub competitor_id: String,
    pub server_time: f64,
    pub local_time: f64,
    pub diff: f64,
    /// `diff / server_time * 100`
    pub diff_pct: f64,
    pub verified: bool,
}

/// Overall outcome shown to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum ValidationStatus {
    Verified,
    Warning { max_diff_pct: f64 },
}

/// Reconciliation of every comparable competitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub status: ValidationStatus,
    pub all_match: bool,
    pub max_diff_pct: f64,
    pub avg_diff_pct: f64,
    pub competitors: Vec<CompetitorValidation>,
}

impl Default for ValidationSummary {
    fn default() -> Self {
        Self {
            status: ValidationStatus::Verified,
            all_match: true,
            max_diff_pct: 0.0,
            avg_diff_pct: 0.0,
            competitors: Vec::new(),
        }
    }
}

impl ValidationSummary {
    pub fn is_verified(&self) -> bool {
        self.status == ValidationStatus::Verified
    }
}

/// Compare local final times with authoritative ones.
///
/// The local time is always the independently simulated one, even when the
/// timeline is played back from authoritative segment times. DNFs, competitors
/// still running and competitors that cannot be simulated are skipped. An
/// empty comparison set is verified.
pub fn validate(timelines: &RaceTimelines, tolerance_pct: f64) -> ValidationSummary {
    let competitors: Vec<CompetitorValidation> = timelines
        .competitors()
        .iter()
        .filter(|c| !c.dnf)
        .filter_map(|c| {
            let server_time = c.server_final_time.filter(|t| *t > 0.0)?;
            let local_time = c.simulated_final_time?;
            let diff = (server_time - local_time).abs();
            let diff_pct = diff / server_time * 100.0;
            Some(CompetitorValidation {
                competitor_id: c.competitor_id.clone(),
                server_time,
                local_time,
                diff,
                diff_pct,
                verified: diff_pct < tolerance_pct,
            })
        })
        .collect();

    if competitors.is_empty() {
        return ValidationSummary::default();
    }

    let max_diff_pct = competitors.iter().map(|v| v.diff_pct).fold(0.0_f64, f64::max);
    let avg_diff_pct = competitors.iter().map(|v| v.diff_pct).sum::<f64>() / competitors.len() as f64;
    let all_match = max_diff_pct < tolerance_pct;

    let status = if all_match {
        ValidationStatus::Verified
    } else {
        warn!(
            max_diff_pct,
            avg_diff_pct,
            mismatched = competitors.iter().filter(|v| !v.verified).count(),
            "Local final times disagree with authoritative results"
        );
        ValidationStatus::Warning { max_diff_pct }
    };

    ValidationSummary { status, all_match, max_diff_pct, avg_diff_pct, competitors }
}
