//! The parsed security.txt document

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// Contents of a security.txt file
///
/// Only the parser constructs this type, and only after every required field
/// has been seen, so `contact` is never empty and `expires` is always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityTxt {
    pub(crate) acknowledgments: Vec<String>,
    pub(crate) canonical: Vec<String>,
    pub(crate) contact: Vec<String>,
    pub(crate) encryption: Option<String>,
    pub(crate) hiring: Option<String>,
    pub(crate) policy: Option<String>,
    pub(crate) preferred_languages: Vec<String>,
    pub(crate) expires: DateTime<FixedOffset>,
}

impl SecurityTxt {
    /// `Acknowledgments` URIs in source order
    pub fn acknowledgments(&self) -> &[String] {
        &self.acknowledgments
    }

    /// `Canonical` URIs in source order
    pub fn canonical(&self) -> &[String] {
        &self.canonical
    }

    /// `Contact` values in source order (at least one)
    pub fn contact(&self) -> &[String] {
        &self.contact
    }

    pub fn encryption(&self) -> Option<&str> {
        self.encryption.as_deref()
    }

    pub fn hiring(&self) -> Option<&str> {
        self.hiring.as_deref()
    }

    pub fn policy(&self) -> Option<&str> {
        self.policy.as_deref()
    }

    /// Language tags from the `Preferred-Languages` line, unvalidated
    pub fn preferred_languages(&self) -> &[String] {
        &self.preferred_languages
    }

    /// `Expires` timestamp with the offset it was written in
    pub fn expires(&self) -> DateTime<FixedOffset> {
        self.expires
    }

    /// Whether the document had expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    /// Whether the document has expired according to the system clock
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
