//! Command-line interface parsing
//!
//! Handles argument parsing and merging flags over the configuration file.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{FileConfig, OutputFormat, ScanConfig};

const AFTER_HELP: &str = "\
TARGETS:
    A target containing \"://\" is fetched over HTTP. When its path is empty
    or \"/\", security.txt and .well-known/security.txt are tried as well.
    Any other target is a local file, or a directory whose *.txt files are
    all checked.

BEHAVIOR:
    Results are always printed to the console (unless --quiet is set).
    Use --output to additionally save results to a JSON file.

EXIT CODES:
    0    Every target yielded a valid security.txt
    1    One or more targets failed
    2    Execution error

EXAMPLES:
    securitytxt https://example.com/
    securitytxt --output results.json ./security.txt https://example.org
    securitytxt --format summary -o out.json --quiet /srv/www/";

/// Fetch and validate security.txt files
#[derive(Debug, Parser)]
#[command(name = "securitytxt", version, about, after_help = AFTER_HELP)]
pub struct Cli {
    /// URLs, files or directories to check
    #[arg(required = true, value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Write results to a JSON file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Format of the JSON results file [default: full]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Suppress console output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log resolution attempts
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// User-Agent header for HTTP requests
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,
}

impl Cli {
    /// Default log filter for this invocation
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "warn"
        }
    }

    /// Layer command-line flags over the file configuration
    pub fn into_scan_config(self, file: FileConfig) -> ScanConfig {
        let mut fetch = file.fetch_config();
        if let Some(secs) = self.timeout {
            fetch.timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = self.user_agent {
            fetch.user_agent = user_agent;
        }

        ScanConfig {
            inputs: self.targets,
            output_file: self.output,
            output_format: self
                .format
                .or(file.output.format)
                .unwrap_or(OutputFormat::Full),
            quiet: self.quiet,
            fetch,
        }
    }
}

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
