//! Error types for parsing and resolution
//!
//! Parsing stops at the first violation and reports it as a [`ParseError`].
//! Resolution may make several attempts; each failure is an [`AttemptError`]
//! and the full ordered chain is kept in an [`AggregateError`].

use std::fmt;

use thiserror::Error;

/// Errors produced by the document parser
#[derive(Debug, Error)]
pub enum ParseError {
    /// A non-blank, non-comment line with no known field prefix
    #[error("unknown line: {line}")]
    UnknownLine { line: String },

    /// `Expires` appeared more than once
    #[error("Expires field must be present only once")]
    DuplicateExpires,

    /// `Preferred-Languages` appeared more than once
    #[error("Preferred-Languages field must be present only once")]
    DuplicatePreferredLanguages,

    /// `Expires` value is not an RFC 3339 timestamp
    #[error("Expires is not a valid RFC 3339 date: {value}")]
    InvalidExpires { value: String },

    /// No `Contact` line in the document
    #[error("Contact must be present")]
    MissingContact,

    /// No `Expires` line in the document
    #[error("Expires must be present")]
    MissingExpires,

    /// The underlying stream could not be read
    #[error("error while reading document: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

impl PartialEq for ParseError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownLine { line: a }, Self::UnknownLine { line: b }) => a == b,
            (Self::InvalidExpires { value: a }, Self::InvalidExpires { value: b }) => a == b,
            (Self::DuplicateExpires, Self::DuplicateExpires)
            | (Self::DuplicatePreferredLanguages, Self::DuplicatePreferredLanguages)
            | (Self::MissingContact, Self::MissingContact)
            | (Self::MissingExpires, Self::MissingExpires) => true,
            // io::Error has no equality; the kind is the comparable payload
            (Self::Io { source: a }, Self::Io { source: b }) => a.kind() == b.kind(),
            _ => false,
        }
    }
}

/// Errors produced while fetching a location
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-success status code
    #[error("got non-success response code [{status}] when calling [{location}]")]
    Status { status: u16, location: String },

    /// The request did not complete (connection, TLS, timeout, body read)
    #[error("request to [{location}] failed: {message}")]
    Transport { location: String, message: String },

    /// The HTTP client could not be constructed
    #[error("unable to build HTTP client: {message}")]
    Client { message: String },
}

impl FetchError {
    /// Location the failed request targeted, if any
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Status { location, .. } | Self::Transport { location, .. } => Some(location),
            Self::Client { .. } => None,
        }
    }

    /// Status code for [`FetchError::Status`]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A single failed resolution attempt
#[derive(Debug, PartialEq, Error)]
pub enum AttemptError {
    /// The document could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The document was fetched but is not a valid security.txt
    #[error("unable to parse document at [{location}]: {source}")]
    Parse {
        location: String,
        #[source]
        source: ParseError,
    },
}

impl AttemptError {
    /// Location this attempt targeted
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Fetch(err) => err.location(),
            Self::Parse { location, .. } => Some(location),
        }
    }
}

/// Every failure from a resolution, in attempt order
#[derive(Debug, Default, PartialEq)]
pub struct AggregateError {
    attempts: Vec<AttemptError>,
}

impl AggregateError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: AttemptError) {
        self.attempts.push(err);
    }

    pub fn attempts(&self) -> &[AttemptError] {
        &self.attempts
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttemptError> {
        self.attempts.iter()
    }

    pub fn into_attempts(self) -> Vec<AttemptError> {
        self.attempts
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attempts.len() {
            0 => return write!(f, "resolution failed"),
            1 => write!(f, "1 error occurred:")?,
            n => write!(f, "{} errors occurred:", n)?,
        }
        for err in &self.attempts {
            write!(f, "\n\t* {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.attempts
            .first()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl<'a> IntoIterator for &'a AggregateError {
    type Item = &'a AttemptError;
    type IntoIter = std::slice::Iter<'a, AttemptError>;

    fn into_iter(self) -> Self::IntoIter {
        self.attempts.iter()
    }
}

/// Errors produced by the location resolver
#[derive(Debug, PartialEq, Error)]
pub enum ResolveError {
    /// The supplied location is not a valid URL; nothing was fetched
    #[error("unable to parse provided URL [{location}]: {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },

    /// Every candidate location failed
    #[error(transparent)]
    Exhausted(#[from] AggregateError),

    /// The default fetcher could not be constructed
    #[error(transparent)]
    Fetcher(FetchError),
}

impl ResolveError {
    /// Per-attempt failures, empty when nothing was attempted
    pub fn attempts(&self) -> &[AttemptError] {
        match self {
            Self::Exhausted(agg) => agg.attempts(),
            _ => &[],
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

    #[test]
    fn test_parse_error_equality_compares_payload() {
        assert_eq!(
            ParseError::UnknownLine {
                line: "x".to_string()
            },
            ParseError::UnknownLine {
                line: "x".to_string()
            }
        );
        assert_ne!(
            ParseError::UnknownLine {
                line: "x".to_string()
            },
            ParseError::UnknownLine {
                line: "y".to_string()
            }
        );
        assert_ne!(ParseError::MissingContact, ParseError::MissingExpires);
    }

    #[test]
    fn test_io_errors_compare_by_kind() {
        let a = ParseError::Io {
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "a"),
        };
        let b = ParseError::Io {
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "b"),
        };
        let c = ParseError::Io {
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "a"),
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            status: 404,
            location: "http://example.com/".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "got non-success response code [404] when calling [http://example.com/]"
        );
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.location(), Some("http://example.com/"));
    }

    #[test]
    fn test_aggregate_display_lists_every_attempt() {
        let mut agg = AggregateError::new();
        agg.push(AttemptError::Fetch(FetchError::Status {
            status: 404,
            location: "http://a/".to_string(),
        }));
        agg.push(AttemptError::Parse {
            location: "http://a/security.txt".to_string(),
            source: ParseError::MissingContact,
        });

        let text = agg.to_string();
        assert!(text.starts_with("2 errors occurred:"));
        assert!(text.contains("[404]"));
        assert!(text.contains("Contact must be present"));
        assert_eq!(agg.len(), 2);
        assert_eq!(agg.attempts()[1].location(), Some("http://a/security.txt"));

        let attempts = agg.into_attempts();
        assert_eq!(attempts.len(), 2);
        assert!(matches!(attempts[0], AttemptError::Fetch(_)));
        assert!(matches!(attempts[1], AttemptError::Parse { .. }));
    }
}
