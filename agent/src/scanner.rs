//! Core scanning logic
//!
//! Checks every target in order and collects one report per target.

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use securitytxt::{
    AttemptError, FetchError, Fetcher, HttpFetcher, ParseError, ResolveError, Resolver,
    SecurityTxt,
};
use serde::Serialize;

use crate::config::{ScanConfig, ScanSummary};
use crate::discovery::Target;
use crate::output;

/// Outcome of checking one target
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    /// Target as given
    pub target: String,

    pub outcome: TargetOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetOutcome {
    /// A valid document was found
    Valid {
        /// Where the document was read from (URL or file path)
        source: String,
        expired: bool,
        document: SecurityTxt,
    },
    /// No valid document; every failure in attempt order
    Failed { failures: Vec<Failure> },
}

impl TargetReport {
    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, TargetOutcome::Valid { .. })
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.outcome, TargetOutcome::Valid { expired: true, .. })
    }
}

/// One failed attempt, flattened for display and JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidLocation,
    Status,
    Transport,
    Client,
    Parse,
    Io,
}

impl Failure {
    fn from_fetch(err: &FetchError) -> Self {
        let kind = match err {
            FetchError::Status { .. } => FailureKind::Status,
            FetchError::Transport { .. } => FailureKind::Transport,
            FetchError::Client { .. } => FailureKind::Client,
        };
        Self {
            kind,
            location: err.location().map(str::to_string),
            status: err.status(),
            message: err.to_string(),
        }
    }

    fn from_attempt(err: &AttemptError) -> Self {
        match err {
            AttemptError::Fetch(fetch) => Self::from_fetch(fetch),
            AttemptError::Parse { location, source } => Self::from_parse(location, source),
        }
    }

    fn from_parse(location: &str, err: &ParseError) -> Self {
        let kind = match err {
            ParseError::Io { .. } => FailureKind::Io,
            _ => FailureKind::Parse,
        };
        Self {
            kind,
            location: Some(location.to_string()),
            status: None,
            message: err.to_string(),
        }
    }

    /// Every failure carried by a resolution error
    fn from_resolve(err: &ResolveError) -> Vec<Self> {
        match err {
            ResolveError::InvalidLocation { location, .. } => vec![Self {
                kind: FailureKind::InvalidLocation,
                location: Some(location.clone()),
                status: None,
                message: err.to_string(),
            }],
            ResolveError::Exhausted(agg) => agg.iter().map(Self::from_attempt).collect(),
            ResolveError::Fetcher(fetch) => vec![Self::from_fetch(fetch)],
        }
    }
}

/// Run a scan with the given configuration
pub fn run_scan(config: &ScanConfig, targets: &[Target]) -> Result<i32, ScanError> {
    let start = Instant::now();

    log::info!("Starting scan of {} target(s)", targets.len());
    if !config.quiet {
        println!();
        println!("security.txt agent v{}", env!("CARGO_PKG_VERSION"));
        println!("Checking {} target(s)...", targets.len());
        println!();
    }

    let fetcher = HttpFetcher::new(&config.fetch).map_err(ScanError::Fetcher)?;
    let resolver = Resolver::new(fetcher);

    let (reports, mut summary) = execute_scans(targets, &resolver, Utc::now(), config.quiet);
    summary.duration = start.elapsed();

    if !config.quiet {
        output::print_results(&reports, &summary);
        print_execution_info(&summary, config);
    }

    if let Some(output_path) = &config.output_file {
        save_output(&reports, &summary, config)?;

        if !config.quiet {
            println!("Results saved to: {}", output_path.display());
            println!();
        }
    }

    log::info!(
        "Scan completed: total={} valid={} expired={} failed={}",
        summary.total_targets,
        summary.valid,
        summary.expired,
        summary.failed
    );

    Ok(summary.exit_code())
}

/// Check every target in order
pub fn execute_scans<F: Fetcher>(
    targets: &[Target],
    resolver: &Resolver<F>,
    now: DateTime<Utc>,
    quiet: bool,
) -> (Vec<TargetReport>, ScanSummary) {
    let mut reports = Vec::with_capacity(targets.len());
    let mut summary = ScanSummary::new(targets.len());

    for (index, target) in targets.iter().enumerate() {
        let report = check_target(target, resolver, now);

        if report.is_valid() {
            summary.valid += 1;
            if report.is_expired() {
                summary.expired += 1;
            }
        } else {
            summary.failed += 1;
        }

        if !quiet {
            output::print_progress_result(index + 1, targets.len(), &report);
        }

        reports.push(report);
    }

    (reports, summary)
}

/// Check a single target
pub fn check_target<F: Fetcher>(
    target: &Target,
    resolver: &Resolver<F>,
    now: DateTime<Utc>,
) -> TargetReport {
    let outcome = match target {
        Target::Remote(location) => match resolver.resolve_detailed(location) {
            Ok(resolution) => valid(resolution.location.to_string(), resolution.document, now),
            Err(e) => {
                log::warn!("No valid security.txt for {}: {}", location, e);
                TargetOutcome::Failed {
                    failures: Failure::from_resolve(&e),
                }
            }
        },
        Target::File(path) => match parse_file(path) {
            Ok(document) => valid(path.display().to_string(), document, now),
            Err(failure) => {
                log::warn!("Invalid security.txt {}: {}", path.display(), failure.message);
                TargetOutcome::Failed {
                    failures: vec![failure],
                }
            }
        },
    };

    TargetReport {
        target: target.to_string(),
        outcome,
    }
}

fn valid(source: String, document: SecurityTxt, now: DateTime<Utc>) -> TargetOutcome {
    let expired = document.is_expired_at(now);
    if expired {
        log::warn!("{} expired at {}", source, document.expires());
    }
    TargetOutcome::Valid {
        source,
        expired,
        document,
    }
}

fn parse_file(path: &Path) -> Result<SecurityTxt, Failure> {
    let location = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| Failure {
        kind: FailureKind::Io,
        location: Some(location.clone()),
        status: None,
        message: format!("Failed to open {}: {}", location, e),
    })?;

    securitytxt::parse(file).map_err(|e| Failure::from_parse(&location, &e))
}

/// Save output to file
fn save_output(
    reports: &[TargetReport],
    summary: &ScanSummary,
    config: &ScanConfig,
) -> Result<(), ScanError> {
    let output_path = match &config.output_file {
        Some(path) => path,
        None => return Ok(()),
    };

    let json =
        output::build_output(reports, summary, config.output_format).map_err(ScanError::Output)?;

    std::fs::write(output_path, &json)
        .map_err(|e| ScanError::WriteFile(output_path.display().to_string(), e))?;

    Ok(())
}

/// Print execution information
fn print_execution_info(summary: &ScanSummary, config: &ScanConfig) {
    println!("────────────────────────────────────────────────────────────────────────────────");
    println!("  Duration:     {:.2}s", summary.duration.as_secs_f64());
    if let Some(output_path) = &config.output_file {
        println!(
            "  Output:       {} ({})",
            output_path.display(),
            config.output_format
        );
    }
    println!("────────────────────────────────────────────────────────────────────────────────");
    println!();
}

/// Errors that can occur during scanning
#[derive(Debug)]
pub enum ScanError {
    /// Failed to build the HTTP client
    Fetcher(FetchError),
    /// Failed to generate output
    Output(output::OutputError),
    /// Failed to write output file
    WriteFile(String, std::io::Error),
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::Fetcher(e) => write!(f, "HTTP client setup failed: {}", e),
            ScanError::Output(e) => write!(f, "Output generation failed: {}", e),
            ScanError::WriteFile(path, e) => write!(f, "Failed to write {}: {}", path, e),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Fetcher(e) => Some(e),
            ScanError::Output(e) => Some(e),
            ScanError::WriteFile(_, e) => Some(e),
        }
    }
}

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use securitytxt::{FetchResponse, Url};

    const DOCUMENT: &str = "Contact: mailto:security@example.com\nExpires: 2030-01-01T00:00:00Z\n";

    /// Serves DOCUMENT at /.well-known/security.txt, 404 elsewhere
    struct WellKnownOnly;

    impl Fetcher for WellKnownOnly {
        fn fetch(&self, location: &Url) -> Result<FetchResponse, FetchError> {
            if location.path() == "/.well-known/security.txt" {
                Ok(FetchResponse::new(200, DOCUMENT))
            } else {
                Ok(FetchResponse::new(404, ""))
            }
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_remote_target_reports_resolved_location() {
        let resolver = Resolver::new(WellKnownOnly);
        let target = Target::Remote("https://example.com".to_string());

        let report = check_target(&target, &resolver, now());

        assert_eq!(report.target, "https://example.com");
        match report.outcome {
            TargetOutcome::Valid {
                source, expired, ..
            } => {
                assert_eq!(source, "https://example.com/.well-known/security.txt");
                assert!(!expired);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_remote_failure_lists_every_attempt() {
        let resolver = Resolver::new(WellKnownOnly);
        let target = Target::Remote("https://example.com/foo".to_string());

        let report = check_target(&target, &resolver, now());

        match report.outcome {
            TargetOutcome::Failed { failures } => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].kind, FailureKind::Status);
                assert_eq!(failures[0].status, Some(404));
                assert_eq!(
                    failures[0].location.as_deref(),
                    Some("https://example.com/foo")
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_location_reported() {
        let resolver = Resolver::new(WellKnownOnly);
        let target = Target::Remote("http://[broken".to_string());

        let report = check_target(&target, &resolver, now());

        match report.outcome {
            TargetOutcome::Failed { failures } => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].kind, FailureKind::InvalidLocation);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_file_targets_and_summary_counts() {
        let dir = std::env::temp_dir().join(format!("securitytxt_scanner_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.txt");
        let expired = dir.join("expired.txt");
        let bad = dir.join("bad.txt");
        std::fs::write(&good, DOCUMENT).unwrap();
        std::fs::write(
            &expired,
            "Contact: mailto:a@example.com\nExpires: 2020-01-01T00:00:00Z\n",
        )
        .unwrap();
        std::fs::write(&bad, "Contact: mailto:a@example.com\nNonsense\n").unwrap();

        let targets = [
            Target::File(good),
            Target::File(expired),
            Target::File(bad.clone()),
        ];
        let resolver = Resolver::new(WellKnownOnly);

        let (reports, summary) = execute_scans(&targets, &resolver, now(), true);

        assert_eq!(summary.total_targets, 3);
        assert_eq!(summary.valid, 2);
        assert_eq!(summary.expired, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exit_code(), 1);

        match &reports[2].outcome {
            TargetOutcome::Failed { failures } => {
                assert_eq!(failures[0].kind, FailureKind::Parse);
                assert_eq!(failures[0].message, "unknown line: Nonsense");
                assert_eq!(failures[0].location, Some(bad.display().to_string()));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_report_serializes_with_status_tag() {
        let resolver = Resolver::new(WellKnownOnly);
        let report = check_target(
            &Target::Remote("https://example.com/".to_string()),
            &resolver,
            now(),
        );

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["outcome"]["status"], "valid");
        assert_eq!(
            json["outcome"]["document"]["contact"][0],
            "mailto:security@example.com"
        );
    }
}
