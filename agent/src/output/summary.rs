//! Summary builder
//!
//! Builds minimal summary output with per-target status only.

use crate::config::ScanSummary;
use crate::scanner::{TargetOutcome, TargetReport};

use super::envelope;

/// Build a summary JSON from all target reports
pub fn build_summary(reports: &[TargetReport], summary: &ScanSummary) -> serde_json::Value {
    let targets: Vec<serde_json::Value> = reports.iter().map(build_target_summary).collect();

    let mut map = envelope(summary);
    map.insert("targets".to_string(), serde_json::Value::Array(targets));
    serde_json::Value::Object(map)
}

/// Build summary for a single target
fn build_target_summary(report: &TargetReport) -> serde_json::Value {
    match &report.outcome {
        TargetOutcome::Valid {
            source,
            expired,
            document,
        } => serde_json::json!({
            "target": report.target,
            "status": "valid",
            "source": source,
            "expired": expired,
            "expires": document.expires().to_rfc3339(),
            "contact_count": document.contact().len()
        }),
        TargetOutcome::Failed { failures } => serde_json::json!({
            "target": report.target,
            "status": "failed",
            "attempts": failures.len()
        }),
    }
}

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
