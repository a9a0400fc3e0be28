//! Output generation module
//!
//! Provides builders for different output formats:
//! - Full results with every parsed field and every failed attempt
//! - Summary (counts and per-target status)
//! - Console (human-readable)
//!
//! Both JSON formats share one envelope so a consumer can tell runs apart:
//!
//! ```text
//! {
//!   "agent":   { "name", "version" },
//!   "run_id":  uuid v4,
//!   "generated_at": RFC 3339 UTC,
//!   "summary": { "total_targets", "valid", "expired", "failed" },
//!   ...format-specific body
//! }
//! ```

mod console;
mod full;
mod summary;

pub use console::{print_progress_result, print_results};
pub use full::build_full_result;
pub use summary::build_summary;

use chrono::{SecondsFormat, Utc};

use crate::config::{OutputFormat, ScanSummary};
use crate::scanner::TargetReport;

/// Build output in the specified format
pub fn build_output(
    reports: &[TargetReport],
    summary: &ScanSummary,
    format: OutputFormat,
) -> Result<String, OutputError> {
    let value = match format {
        OutputFormat::Full => build_full_result(reports, summary)?,
        OutputFormat::Summary => build_summary(reports, summary),
    };

    serde_json::to_string_pretty(&value).map_err(|e| OutputError::Serialization(e.to_string()))
}

/// Envelope fields shared by every JSON format
fn envelope(summary: &ScanSummary) -> serde_json::Map<String, serde_json::Value> {
    let mut map = serde_json::Map::new();
    map.insert(
        "agent".to_string(),
        serde_json::json!({
            "name": "securitytxt",
            "version": env!("CARGO_PKG_VERSION")
        }),
    );
    map.insert(
        "run_id".to_string(),
        serde_json::Value::String(uuid::Uuid::new_v4().to_string()),
    );
    map.insert(
        "generated_at".to_string(),
        serde_json::Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    map.insert(
        "summary".to_string(),
        serde_json::json!({
            "total_targets": summary.total_targets,
            "valid": summary.valid,
            "expired": summary.expired,
            "failed": summary.failed,
            "duration_ms": summary.duration.as_millis() as u64
        }),
    );
    map
}

// ============================================================================
// Errors
// ============================================================================

/// Errors that can occur during output generation
#[derive(Debug)]
pub enum OutputError {
    /// Failed to build result
    Build(String),
    /// Failed to serialize result
    Serialization(String),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Build(msg) => write!(f, "Failed to build output: {}", msg),
            OutputError::Serialization(msg) => write!(f, "Failed to serialize output: {}", msg),
        }
    }
}

impl std::error::Error for OutputError {}

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
