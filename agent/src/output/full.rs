//! Full result builder
//!
//! Builds complete results: every parsed field for valid targets and the
//! ordered failure chain for failed ones.

use crate::config::ScanSummary;
use crate::scanner::TargetReport;

use super::{envelope, OutputError};

/// Build a FullResult containing every target report in a single envelope
pub fn build_full_result(
    reports: &[TargetReport],
    summary: &ScanSummary,
) -> Result<serde_json::Value, OutputError> {
    let targets = serde_json::to_value(reports)
        .map_err(|e| OutputError::Build(format!("Failed to convert reports: {}", e)))?;

    let mut map = envelope(summary);
    map.insert("targets".to_string(), targets);
    Ok(serde_json::Value::Object(map))
}

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
