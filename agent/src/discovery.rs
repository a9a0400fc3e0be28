//! Target discovery
//!
//! Turns command-line inputs into concrete targets: remote locations, or
//! security.txt files on disk.

use std::fmt;
use std::path::{Path, PathBuf};

/// A single thing to check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Remote location handed to the resolver
    Remote(String),
    /// Local file handed to the parser
    File(PathBuf),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Remote(location) => write!(f, "{}", location),
            Target::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Expand every input into targets, preserving input order
///
/// Anything containing `://` is remote. A file path is a single target. A
/// directory contributes its `*.txt` files (non-recursive, sorted).
pub fn discover_targets(inputs: &[String]) -> Result<Vec<Target>, DiscoveryError> {
    let mut targets = Vec::new();

    for input in inputs {
        if input.contains("://") {
            targets.push(Target::Remote(input.clone()));
            continue;
        }

        let path = Path::new(input);
        if path.is_file() {
            targets.push(Target::File(path.to_path_buf()));
        } else if path.is_dir() {
            targets.extend(discover_in_directory(path)?.into_iter().map(Target::File));
        } else {
            return Err(DiscoveryError::InvalidPath(path.to_path_buf()));
        }
    }

    Ok(targets)
}

/// Discover .txt files in a directory (non-recursive)
fn discover_in_directory(dir_path: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut txt_files = Vec::new();

    let entries = std::fs::read_dir(dir_path)
        .map_err(|e| DiscoveryError::ReadDir(dir_path.to_path_buf(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| DiscoveryError::ReadEntry(dir_path.to_path_buf(), e))?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension() {
                if ext == "txt" {
                    txt_files.push(path);
                }
            }
        }
    }

    txt_files.sort();
    Ok(txt_files)
}

/// Errors that can occur during target discovery
#[derive(Debug)]
pub enum DiscoveryError {
    /// Path is neither a file nor a directory
    InvalidPath(PathBuf),
    /// Failed to read directory
    ReadDir(PathBuf, std::io::Error),
    /// Failed to read directory entry
    ReadEntry(PathBuf, std::io::Error),
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::InvalidPath(p) => write!(f, "Path not found: {}", p.display()),
            DiscoveryError::ReadDir(p, e) => {
                write!(f, "Failed to read directory {}: {}", p.display(), e)
            }
            DiscoveryError::ReadEntry(p, e) => {
                write!(f, "Failed to read entry in {}: {}", p.display(), e)
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::InvalidPath(_) => None,
            DiscoveryError::ReadDir(_, e) | DiscoveryError::ReadEntry(_, e) => Some(e),
        }
    }
}

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
