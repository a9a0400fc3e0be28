//! Location resolver
//!
//! Finds a security.txt when only a base location is known.
//!
//! ## Search order
//!
//! ```text
//! https://example.com/            (as given)
//!   └─ failed and path is "" or "/"
//!        ├─► https://example.com/security.txt
//!        └─► https://example.com/.well-known/security.txt
//! ```
//!
//! Attempts run one after the other and stop at the first success. A
//! location with any other path gets exactly one attempt. When everything
//! fails the caller receives every failure in attempt order.

use url::Url;

use crate::document::SecurityTxt;
use crate::error::{AggregateError, AttemptError, FetchError, ResolveError};
use crate::fetch::Fetcher;
use crate::parser::Parser;

/// Relative paths tried, in order, when the base location has no path
pub const WELL_KNOWN_PATHS: [&str; 2] = ["security.txt", ".well-known/security.txt"];

/// A document together with the location it was found at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub location: Url,
    pub document: SecurityTxt,
}

/// Fetches and parses security.txt documents through a [`Fetcher`]
#[derive(Debug, Clone)]
pub struct Resolver<F> {
    fetcher: F,
    parser: Parser,
}

impl<F: Fetcher> Resolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_parser(fetcher, Parser::new())
    }

    pub fn with_parser(fetcher: F, parser: Parser) -> Self {
        Self { fetcher, parser }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolve `location` to a document
    pub fn resolve(&self, location: &str) -> Result<SecurityTxt, ResolveError> {
        self.resolve_detailed(location).map(|r| r.document)
    }

    /// Resolve `location`, also reporting which candidate succeeded
    pub fn resolve_detailed(&self, location: &str) -> Result<Resolution, ResolveError> {
        let base = Url::parse(location).map_err(|source| ResolveError::InvalidLocation {
            location: location.to_string(),
            source,
        })?;

        let mut failures = AggregateError::new();

        match self.attempt(&base) {
            Ok(document) => {
                return Ok(Resolution {
                    location: base,
                    document,
                })
            }
            Err(err) => {
                log::warn!("Unable to parse file at given location {}: {}", base, err);
                failures.push(err);
            }
        }

        if has_empty_path(&base) {
            log::warn!(
                "Provided URL {} has empty path, trying more URLs with known paths",
                base
            );

            for candidate in candidates(&base) {
                log::info!("Trying URL {}", candidate);

                match self.attempt(&candidate) {
                    Ok(document) => {
                        return Ok(Resolution {
                            location: candidate,
                            document,
                        })
                    }
                    Err(err) => {
                        log::warn!(
                            "Unable to parse file at given location {}: {}",
                            candidate,
                            err
                        );
                        failures.push(err);
                    }
                }
            }
        }

        Err(ResolveError::Exhausted(failures))
    }

    /// Fetch and parse a single location
    fn attempt(&self, location: &Url) -> Result<SecurityTxt, AttemptError> {
        let response = self.fetcher.fetch(location)?;

        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status,
                location: location.to_string(),
            }
            .into());
        }

        self.parser
            .parse_bytes(&response.body)
            .map_err(|source| AttemptError::Parse {
                location: location.to_string(),
                source,
            })
    }
}

/// Whether fallback candidates apply to this location
pub fn has_empty_path(location: &Url) -> bool {
    matches!(location.path(), "" | "/")
}

/// Well-known candidates under `base`, in search order
///
/// Scheme, credentials, host and port are kept. Query and fragment are not
/// carried over.
pub fn candidates(base: &Url) -> Vec<Url> {
    WELL_KNOWN_PATHS
        .iter()
        .map(|path| {
            let mut candidate = base.clone();
            candidate.set_path(&format!("/{}", path));
            candidate.set_query(None);
            candidate.set_fragment(None);
            candidate
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
