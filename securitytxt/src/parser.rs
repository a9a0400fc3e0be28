//! security.txt document parser
//!
//! Single forward pass over the input, one line at a time:
//!
//! ```text
//! line ─► trim ─► blank / "#..." ─► skip
//!                 "<Field>: value" ─► apply to accumulator
//!                 anything else   ─► ParseError::UnknownLine
//! end  ─► read error? ─► Contact present? ─► Expires present? ─► SecurityTxt
//! ```
//!
//! The first violation ends the parse. No partial document is returned.

use std::fmt;
use std::io::{BufRead, BufReader, Read};

use chrono::{DateTime, FixedOffset};

use crate::document::SecurityTxt;
use crate::error::ParseError;

/// Lines starting with this marker are ignored
pub const COMMENT_MARKER: char = '#';

/// Fields recognised by the parser
///
/// Every prefix is `"<Name>:"` with exact case. No prefix is a prefix of
/// another, so at most one field matches any line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Acknowledgments,
    Canonical,
    Contact,
    Encryption,
    Hiring,
    Expires,
    Policy,
    PreferredLanguages,
}

impl Field {
    /// All fields in matching order
    pub const ALL: [Field; 8] = [
        Field::Acknowledgments,
        Field::Canonical,
        Field::Contact,
        Field::Encryption,
        Field::Hiring,
        Field::Expires,
        Field::Policy,
        Field::PreferredLanguages,
    ];

    /// Field name as written in the file
    pub fn name(&self) -> &'static str {
        match self {
            Field::Acknowledgments => "Acknowledgments",
            Field::Canonical => "Canonical",
            Field::Contact => "Contact",
            Field::Encryption => "Encryption",
            Field::Hiring => "Hiring",
            Field::Expires => "Expires",
            Field::Policy => "Policy",
            Field::PreferredLanguages => "Preferred-Languages",
        }
    }

    /// Line prefix identifying the field
    pub fn prefix(&self) -> &'static str {
        match self {
            Field::Acknowledgments => "Acknowledgments:",
            Field::Canonical => "Canonical:",
            Field::Contact => "Contact:",
            Field::Encryption => "Encryption:",
            Field::Hiring => "Hiring:",
            Field::Expires => "Expires:",
            Field::Policy => "Policy:",
            Field::PreferredLanguages => "Preferred-Languages:",
        }
    }

    /// Split a trimmed line into its field and space-trimmed value
    pub fn split(line: &str) -> Option<(Field, &str)> {
        Field::ALL.iter().find_map(|field| {
            line.strip_prefix(field.prefix())
                .map(|rest| (*field, rest.trim_matches(' ')))
        })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stateless security.txt parser
///
/// Holds no state between calls, so one instance can serve any number of
/// parses, including the crate-level default used by [`crate::parse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    _private: (),
}

impl Parser {
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Parse a document from a byte stream
    ///
    /// The stream is only read, never closed; the caller keeps ownership.
    pub fn parse<R: Read>(&self, reader: R) -> Result<SecurityTxt, ParseError> {
        self.parse_buffered(BufReader::new(reader))
    }

    /// Parse a document from an already-buffered stream
    pub fn parse_buffered<R: BufRead>(&self, mut reader: R) -> Result<SecurityTxt, ParseError> {
        let mut fields = Fields::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ParseError::Io { source })?;
            if read == 0 {
                break;
            }

            // Only field prefixes matter, so undecodable bytes are replaced
            let line = String::from_utf8_lossy(strip_line_ending(&buf));
            fields.apply(line.trim())?;
        }

        fields.finish()
    }

    /// Parse a document held in memory
    pub fn parse_str(&self, text: &str) -> Result<SecurityTxt, ParseError> {
        self.parse_buffered(text.as_bytes())
    }

    /// Parse a document from raw bytes (for example an HTTP body)
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<SecurityTxt, ParseError> {
        self.parse_buffered(bytes)
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Seconds from the Unix epoch to 0001-01-01T00:00:00Z
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// Whether `time` is the zero instant, which counts as no expiry at all
fn is_zero_time(time: &DateTime<FixedOffset>) -> bool {
    time.timestamp() == ZERO_TIME_SECS && time.timestamp_subsec_nanos() == 0
}

/// Values accumulated while scanning, turned into a document at the end
#[derive(Debug, Default)]
struct Fields {
    acknowledgments: Vec<String>,
    canonical: Vec<String>,
    contact: Vec<String>,
    encryption: Option<String>,
    hiring: Option<String>,
    policy: Option<String>,
    preferred_languages: Vec<String>,
    expires: Option<DateTime<FixedOffset>>,
}

impl Fields {
    /// Apply one trimmed line
    fn apply(&mut self, line: &str) -> Result<(), ParseError> {
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            return Ok(());
        }

        let (field, value) = Field::split(line).ok_or_else(|| ParseError::UnknownLine {
            line: line.to_string(),
        })?;

        match field {
            Field::Acknowledgments => self.acknowledgments.push(value.to_string()),
            Field::Canonical => self.canonical.push(value.to_string()),
            Field::Contact => self.contact.push(value.to_string()),
            // Last occurrence wins for these three
            Field::Encryption => self.encryption = Some(value.to_string()),
            Field::Hiring => self.hiring = Some(value.to_string()),
            Field::Policy => self.policy = Some(value.to_string()),
            Field::Expires => {
                if self.expires.is_some() {
                    return Err(ParseError::DuplicateExpires);
                }
                let expires = DateTime::parse_from_rfc3339(value).map_err(|_| {
                    ParseError::InvalidExpires {
                        value: value.to_string(),
                    }
                })?;
                // A zero instant leaves the field unset
                if !is_zero_time(&expires) {
                    self.expires = Some(expires);
                }
            }
            Field::PreferredLanguages => {
                if !self.preferred_languages.is_empty() {
                    return Err(ParseError::DuplicatePreferredLanguages);
                }
                self.preferred_languages
                    .extend(value.split(',').map(|tag| tag.trim_matches(' ').to_string()));
            }
        }

        Ok(())
    }

    /// Check required fields and build the document
    fn finish(self) -> Result<SecurityTxt, ParseError> {
        if self.contact.is_empty() {
            return Err(ParseError::MissingContact);
        }

        let expires = self.expires.ok_or(ParseError::MissingExpires)?;

        Ok(SecurityTxt {
            acknowledgments: self.acknowledgments,
            canonical: self.canonical,
            contact: self.contact,
            encryption: self.encryption,
            hiring: self.hiring,
            policy: self.policy,
            preferred_languages: self.preferred_languages,
            expires,
        })
    }
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
