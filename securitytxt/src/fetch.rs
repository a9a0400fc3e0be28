//! Fetch capability used by the resolver
//!
//! The resolver only needs "give me the status and body at this URL". That
//! seam is the [`Fetcher`] trait, so tests and embedders can supply their own
//! transport. [`HttpFetcher`] is the default, a blocking HTTP client.
//!
//! Fetchers report transport failures only. Deciding whether a status code
//! counts as success is left to the resolver.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::error::FetchError;

/// Status and body returned by a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves the raw bytes stored at a location
pub trait Fetcher {
    /// Fetch `location`
    ///
    /// Returns `Err` only when no response was obtained (connection refused,
    /// DNS failure, timeout, truncated body). Any response, whatever its
    /// status, is `Ok`.
    fn fetch(&self, location: &Url) -> Result<FetchResponse, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, location: &Url) -> Result<FetchResponse, FetchError> {
        (**self).fetch(location)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, location: &Url) -> Result<FetchResponse, FetchError> {
        (**self).fetch(location)
    }
}

/// Settings for [`HttpFetcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Deadline for the whole request, body included
    pub timeout: Duration,

    /// `User-Agent` header sent with every request
    pub user_agent: String,

    /// Bodies larger than this are rejected
    pub max_body_bytes: u64,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment
    pub use_system_proxy: bool,
}

/// Default request deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default body size cap (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: u64 = 1024 * 1024;

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            use_system_proxy: true,
        }
    }
}

/// `securitytxt/<version>`
pub fn default_user_agent() -> String {
    format!("securitytxt/{}", env!("CARGO_PKG_VERSION"))
}

/// Blocking HTTP fetcher built on `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: u64,
}

impl HttpFetcher {
    /// Build a fetcher from the given settings
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());

        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(|e| FetchError::Client {
            message: error_chain(&e),
        })?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, location: &Url) -> Result<FetchResponse, FetchError> {
        log::debug!("GET {}", location);

        let response = self
            .client
            .get(location.clone())
            .send()
            .map_err(|e| transport(location, error_chain(&e)))?;

        let status = response.status().as_u16();

        // Bodies of failed responses are never parsed
        if !response.status().is_success() {
            return Ok(FetchResponse::new(status, Vec::new()));
        }

        let mut body = Vec::new();
        response
            .take(self.max_body_bytes.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|e| transport(location, format!("error reading body: {}", e)))?;

        if body.len() as u64 > self.max_body_bytes {
            return Err(transport(
                location,
                format!("response body exceeds {} bytes", self.max_body_bytes),
            ));
        }

        log::debug!("{} answered {} with {} bytes", location, status, body.len());

        Ok(FetchResponse { status, body })
    }
}

fn transport(location: &Url, message: String) -> FetchError {
    FetchError::Transport {
        location: location.to_string(),
        message,
    }
}

/// Flatten an error and its sources into one line
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
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
#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve, Route};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&FetchConfig {
            timeout: Duration::from_secs(5),
            use_system_proxy: false,
            ..FetchConfig::default()
        })
        .expect("client")
    }

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();

        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("securitytxt/"));
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_response_success_range() {
        assert!(FetchResponse::new(200, "").is_success());
        assert!(FetchResponse::new(204, "").is_success());
        assert!(!FetchResponse::new(301, "").is_success());
        assert!(!FetchResponse::new(404, "").is_success());
        assert!(!FetchResponse::new(199, "").is_success());
    }

    #[test]
    fn test_fetch_returns_status_and_body() {
        let base = serve(vec![Route::new("/security.txt", 200, "Contact: c\n")]);
        let url = Url::parse(&format!("{}/security.txt", base)).unwrap();

        let response = fetcher().fetch(&url).unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"Contact: c\n");
    }

    #[test]
    fn test_fetch_non_success_is_not_an_error() {
        let base = serve(vec![]);
        let url = Url::parse(&format!("{}/missing", base)).unwrap();

        let response = fetcher().fetch(&url).unwrap();

        assert_eq!(response.status, 404);
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_fetch_rejects_oversized_body() {
        let base = serve(vec![Route::new("/big", 200, "0123456789")]);
        let url = Url::parse(&format!("{}/big", base)).unwrap();
        let fetcher = HttpFetcher::new(&FetchConfig {
            max_body_bytes: 4,
            use_system_proxy: false,
            ..FetchConfig::default()
        })
        .unwrap();

        let err = fetcher.fetch(&url).unwrap_err();

        assert!(matches!(err, FetchError::Transport { ref message, .. } if message.contains("exceeds 4 bytes")));
    }

    #[test]
    fn test_fetch_connection_refused_is_transport_error() {
        // Bind then drop to get a port with nothing listening
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();

        let err = fetcher().fetch(&url).unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.location(), Some(url.as_str()));
    }

    #[test]
    fn test_error_chain_joins_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "inner");
        let outer = crate::error::ParseError::Io { source: inner };

        assert_eq!(
            error_chain(&outer),
            "error while reading document: inner: inner"
        );
    }
}
