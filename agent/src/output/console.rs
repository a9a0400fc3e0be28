//! Console output formatting
//!
//! Provides formatted console output for scan results.

use securitytxt::SecurityTxt;

use crate::config::ScanSummary;
use crate::scanner::{Failure, TargetOutcome, TargetReport};

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Print scan results to console in a human-readable format
pub fn print_results(reports: &[TargetReport], summary: &ScanSummary) {
    if reports.is_empty() {
        return;
    }

    println!();
    println!("╔═══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                              SCAN RESULTS                                     ║");
    println!("╚═══════════════════════════════════════════════════════════════════════════════╝");
    println!();

    for (index, report) in reports.iter().enumerate() {
        print_target_result(index + 1, reports.len(), report);
    }

    print_summary_table(summary);
}

/// Print a single target result
fn print_target_result(num: usize, total: usize, report: &TargetReport) {
    println!("┌───────────────────────────────────────────────────────────────────────────────┐");
    println!("│ Target {}/{}: {}", num, total, report.target);
    println!("├───────────────────────────────────────────────────────────────────────────────┤");

    match &report.outcome {
        TargetOutcome::Valid {
            source,
            expired,
            document,
        } => {
            if *expired {
                println!("│ Status:      {}! EXPIRED{}", YELLOW, RESET);
            } else {
                println!("│ Status:      {}✓ VALID{}", GREEN, RESET);
            }
            println!("│ Source:      {}", source);
            print_document(document);
        }
        TargetOutcome::Failed { failures } => {
            println!("│ Status:      {}✗ FAILED{}", RED, RESET);
            println!("│ Attempts ({}):", failures.len());
            for failure in failures {
                println!("│   • {}", describe_failure(failure));
            }
        }
    }

    println!("└───────────────────────────────────────────────────────────────────────────────┘");
    println!();
}

fn print_document(document: &SecurityTxt) {
    println!("│ Expires:     {}", document.expires().to_rfc3339());
    print_list("Contact", document.contact());
    if let Some(encryption) = document.encryption() {
        println!("│ Encryption:  {}", encryption);
    }
    if let Some(policy) = document.policy() {
        println!("│ Policy:      {}", policy);
    }
    if let Some(hiring) = document.hiring() {
        println!("│ Hiring:      {}", hiring);
    }
    print_list("Ack", document.acknowledgments());
    print_list("Canonical", document.canonical());
    if !document.preferred_languages().is_empty() {
        println!(
            "│ Languages:   {}",
            document.preferred_languages().join(", ")
        );
    }
}

fn print_list(label: &str, values: &[String]) {
    for (i, value) in values.iter().enumerate() {
        if i == 0 {
            println!("│ {:<12} {}", format!("{}:", label), value);
        } else {
            println!("│              {}", value);
        }
    }
}

/// One-line description of a failed attempt
fn describe_failure(failure: &Failure) -> String {
    match (&failure.location, failure.status) {
        (Some(location), Some(status)) => format!("[{}] {}", status, location),
        _ => failure.message.clone(),
    }
}

/// Print summary table
fn print_summary_table(summary: &ScanSummary) {
    println!("╔═══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                                 SUMMARY                                       ║");
    println!("╠═══════════════════════════════════════════════════════════════════════════════╣");
    println!("║                                                                               ║");
    println!(
        "║   Total Targets:  {:3}                                                         ║",
        summary.total_targets
    );
    println!("║   {}Valid:{}          {:3}                                                         ║", GREEN, RESET, summary.valid);
    println!("║   {}Expired:{}        {:3}                                                         ║", YELLOW, RESET, summary.expired);
    println!("║   {}Failed:{}         {:3}                                                         ║", RED, RESET, summary.failed);
    println!("║                                                                               ║");
    println!("╚═══════════════════════════════════════════════════════════════════════════════╝");
    println!();
}

/// Print a compact single-line result for progress output
pub fn print_progress_result(num: usize, total: usize, report: &TargetReport) {
    match &report.outcome {
        TargetOutcome::Valid {
            source, expired, ..
        } => {
            let (color, icon, note) = if *expired {
                (YELLOW, "!", "expired")
            } else {
                (GREEN, "✓", "valid")
            };
            println!(
                "[{}/{}] {}{}{} {} ({} at {})",
                num, total, color, icon, RESET, report.target, note, source
            );
        }
        TargetOutcome::Failed { failures } => {
            println!(
                "[{}/{}] {}✗{} {} ({} failed attempt(s))",
                num,
                total,
                RED,
                RESET,
                report.target,
                failures.len()
            );
            for failure in failures {
                println!("       └─ {}", failure.message);
            }
        }
    }
}

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
