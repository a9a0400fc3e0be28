//! # security.txt Agent
//!
//! Fetches and validates `security.txt` files from sites and local paths.
//!
//! ## Usage
//!
//! ```bash
//! # Check a site (tries /, /security.txt, /.well-known/security.txt)
//! securitytxt https://example.com/
//!
//! # Check local files or a directory of them
//! securitytxt ./security.txt /srv/www/
//!
//! # Save results as JSON
//! securitytxt --format summary -o summary.json https://example.com/
//! ```
//!
//! ## Output Formats
//!
//! - **full** (default): Every parsed field and every failed attempt
//! - **summary**: Per-target status and counts only
//!
//! Logging goes to stderr through `env_logger`; `--verbose` shows each
//! resolution attempt and `RUST_LOG` overrides the filter.

mod cli;
mod config;
mod discovery;
mod output;
mod scanner;

use clap::Parser;

use cli::Cli;
use config::FileConfig;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .init();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Run the scan described by the command line
fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = cli.into_scan_config(file_config);

    let targets = discovery::discover_targets(&config.inputs)?;

    if targets.is_empty() {
        if !config.quiet {
            println!("No security.txt targets found in: {}", config.inputs.join(", "));
        }
        return Ok(0);
    }

    let exit_code = scanner::run_scan(&config, &targets)?;

    Ok(exit_code)
}
