//! # securitytxt
//!
//! Parser and resolver for `security.txt` files, the line-oriented documents
//! organisations publish to advertise their vulnerability-disclosure
//! contacts.
//!
//! ## Modules
//!
//! - `document` - The parsed [`SecurityTxt`] record
//! - `parser` - Single-pass line parser with per-field rules
//! - `resolver` - Finds a document from a base URL, trying well-known paths
//! - `fetch` - The [`Fetcher`] seam and the default blocking HTTP fetcher
//! - `error` - Parse, fetch and resolution error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::fs::File;
//!
//! // From a file
//! let txt = securitytxt::parse(File::open("security.txt")?)?;
//! println!("Contacts: {:?}", txt.contact());
//!
//! // From a site; tries /, /security.txt, /.well-known/security.txt
//! let txt = securitytxt::resolve("https://example.com/")?;
//! println!("Expires: {}", txt.expires());
//! ```
//!
//! To control the transport (timeouts, proxies, or a test double), build a
//! [`Resolver`] around your own [`Fetcher`] instead of using the free
//! functions.

pub mod document;
pub mod error;
pub mod fetch;
pub mod parser;
pub mod resolver;

#[cfg(test)]
mod test_support;

use std::io::Read;
use std::sync::OnceLock;

pub use document::SecurityTxt;
pub use error::{AggregateError, AttemptError, FetchError, ParseError, ResolveError};
pub use fetch::{FetchConfig, FetchResponse, Fetcher, HttpFetcher};
pub use parser::{Field, Parser};
pub use resolver::{Resolution, Resolver, WELL_KNOWN_PATHS};
pub use url::Url;

/// Parser behind the crate-level functions
static DEFAULT_PARSER: Parser = Parser::new();

/// Resolver behind [`resolve`], built on first use
static DEFAULT_RESOLVER: OnceLock<Resolver<HttpFetcher>> = OnceLock::new();

/// Parse a security.txt document using the default parser
pub fn parse<R: Read>(reader: R) -> Result<SecurityTxt, ParseError> {
    DEFAULT_PARSER.parse(reader)
}

/// Parse an in-memory security.txt document using the default parser
pub fn parse_str(text: &str) -> Result<SecurityTxt, ParseError> {
    DEFAULT_PARSER.parse_str(text)
}

/// Resolve a document from `location` using the default HTTP fetcher
pub fn resolve(location: &str) -> Result<SecurityTxt, ResolveError> {
    default_resolver()?.resolve(location)
}

/// Like [`resolve`], also returning the location the document came from
pub fn resolve_detailed(location: &str) -> Result<Resolution, ResolveError> {
    default_resolver()?.resolve_detailed(location)
}

fn default_resolver() -> Result<&'static Resolver<HttpFetcher>, ResolveError> {
    if let Some(resolver) = DEFAULT_RESOLVER.get() {
        return Ok(resolver);
    }

    let fetcher = HttpFetcher::new(&FetchConfig::default()).map_err(ResolveError::Fetcher)?;
    Ok(DEFAULT_RESOLVER.get_or_init(|| Resolver::with_parser(fetcher, DEFAULT_PARSER)))
}

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
