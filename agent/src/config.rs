//! Configuration types for the agent
//!
//! Settings come from two places: an optional TOML file and the command
//! line. The file is read into [`FileConfig`], then command-line flags are
//! layered on top to produce the [`ScanConfig`] used for the run.
//!
//! ```toml
//! [http]
//! timeout_secs = 15
//! user_agent = "acme-security-audit/1.0"
//! max_body_bytes = 65536
//! use_system_proxy = false
//!
//! [output]
//! format = "summary"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use securitytxt::FetchConfig;
use serde::Deserialize;

/// Output format for the results file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Counts and per-target status only
    Summary,
    /// Every parsed field and every failed attempt
    Full,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Summary => write!(f, "summary"),
            OutputFormat::Full => write!(f, "full"),
        }
    }
}

/// Configuration for a scan run
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Targets as given on the command line (URLs, files, directories)
    pub inputs: Vec<String>,

    /// Output file path (None means console-only output)
    pub output_file: Option<PathBuf>,

    /// Output format
    pub output_format: OutputFormat,

    /// Suppress progress output
    pub quiet: bool,

    /// HTTP settings for remote targets
    pub fetch: FetchConfig,
}

// ============================================================================
// Configuration file
// ============================================================================

/// Contents of the TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub http: HttpSection,

    #[serde(default)]
    pub output: OutputSection,
}

/// `[http]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub max_body_bytes: Option<u64>,
    pub use_system_proxy: Option<bool>,
}

/// `[output]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
}

impl FileConfig {
    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_toml(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Fetch settings from the file, defaults where unset
    pub fn fetch_config(&self) -> FetchConfig {
        let defaults = FetchConfig::default();
        FetchConfig {
            timeout: self
                .http
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            user_agent: self
                .http
                .user_agent
                .clone()
                .unwrap_or(defaults.user_agent),
            max_body_bytes: self.http.max_body_bytes.unwrap_or(defaults.max_body_bytes),
            use_system_proxy: self
                .http
                .use_system_proxy
                .unwrap_or(defaults.use_system_proxy),
        }
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the file
    Read(PathBuf, std::io::Error),
    /// File is not valid TOML or has unknown keys
    Parse(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(p, e) => write!(f, "Failed to read config {}: {}", p.display(), e),
            ConfigError::Parse(p, e) => {
                write!(f, "Invalid config {}: {}", p.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read(_, e) => Some(e),
            ConfigError::Parse(_, e) => Some(e),
        }
    }
}

// ============================================================================
// Run summary
// ============================================================================

/// Result of a scan run
#[derive(Debug)]
pub struct ScanSummary {
    /// Total targets scanned
    pub total_targets: usize,

    /// Targets that produced a valid document
    pub valid: usize,

    /// Valid documents whose Expires date has passed
    pub expired: usize,

    /// Targets where no valid document was found
    pub failed: usize,

    /// Total scan duration
    pub duration: Duration,
}

impl ScanSummary {
    /// Create a new scan summary
    pub fn new(total_targets: usize) -> Self {
        Self {
            total_targets,
            valid: 0,
            expired: 0,
            failed: 0,
            duration: Duration::ZERO,
        }
    }

    /// Get the exit code based on results
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
