//! Final results listing
//!
//! Unlike the live ranking, the listing keeps DNF competitors: they appear
//! after everyone with a valid time, flagged.

use serde::{Deserialize, Serialize};

use crate::types::AuthoritativeResult;

/// One row of the final results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub competitor_id: String,
    pub position: Option<u32>,
    pub final_time: Option<f64>,
    pub dnf: bool,
}

fn group(result: &AuthoritativeResult, dnf_threshold: f64) -> u8 {
    match result.final_time {
        Some(_) if result.is_dnf(dnf_threshold) => 1,
        Some(_) => 0,
        None => 2,
    }
}

/// Results ordered by authoritative position.
///
/// Finishers come first, then DNFs, then competitors without a final time.
/// Within a group rows follow `position`, then final time.
pub fn final_standings(results: &[AuthoritativeResult], dnf_threshold: f64) -> Vec<Standing> {
    let mut ordered: Vec<&AuthoritativeResult> = results.iter().collect();
    ordered.sort_by(|a, b| {
        group(a, dnf_threshold)
            .cmp(&group(b, dnf_threshold))
            .then_with(|| a.position.unwrap_or(u32::MAX).cmp(&b.position.unwrap_or(u32::MAX)))
            .then_with(|| {
                a.final_time
                    .unwrap_or(f64::INFINITY)
                    .total_cmp(&b.final_time.unwrap_or(f64::INFINITY))
            })
    });

    ordered
        .into_iter()
        .map(|r| Standing {
            competitor_id: r.competitor_id.clone(),
            position: r.position,
            final_time: r.final_time,
            dnf: r.is_dnf(dnf_threshold),
        })
        .collect()
}
