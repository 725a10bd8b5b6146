//! Search query classification.
//!
//! User search input is either an identifier (DOI or ISBN) or free text.
//! [`parse_query`] classifies one query string and carries the normalized
//! identifier value so provider adapters can pick the right lookup path
//! (e.g. Crossref's by-DOI endpoint instead of a keyword search).
//!
//! # Example
//!
//! ```
//! use foliocite_core::query::{parse_query, QueryKind};
//!
//! let q = parse_query("https://doi.org/10.1038/nature12373");
//! assert_eq!(q.kind, QueryKind::Doi);
//! assert_eq!(q.value, "10.1038/nature12373");
//!
//! let q = parse_query("pale blue dot");
//! assert_eq!(q.kind, QueryKind::FreeText);
//! ```

use std::fmt;

mod doi;
mod isbn;

pub use doi::parse_doi;
pub use isbn::parse_isbn;

/// The recognized form of a search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// A Digital Object Identifier.
    Doi,
    /// An ISBN-10 or ISBN-13.
    Isbn,
    /// Anything else; searched as keywords.
    FreeText,
}

impl QueryKind {
    /// Returns a human-readable name for logging and messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doi => "DOI",
            Self::Isbn => "ISBN",
            Self::FreeText => "free text",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// The input exactly as the user typed it.
    pub raw: String,
    /// What the input was recognized as.
    pub kind: QueryKind,
    /// The normalized identifier, or the trimmed text for free-text queries.
    pub value: String,
}

impl ParsedQuery {
    /// Creates a DOI query with its normalized value.
    #[must_use]
    pub fn doi(raw: &str, value: String) -> Self {
        Self {
            raw: raw.to_string(),
            kind: QueryKind::Doi,
            value,
        }
    }

    /// Creates an ISBN query with its normalized value.
    #[must_use]
    pub fn isbn(raw: &str, value: String) -> Self {
        Self {
            raw: raw.to_string(),
            kind: QueryKind::Isbn,
            value,
        }
    }

    /// Creates a free-text query.
    #[must_use]
    pub fn free_text(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            kind: QueryKind::FreeText,
            value: raw.trim().to_string(),
        }
    }
}

/// Classifies one search query as a DOI, an ISBN, or free text.
///
/// Identifier detection is strict (prefix stripping plus checksum/shape
/// validation), so ordinary titles containing digits stay free text.
#[must_use]
pub fn parse_query(raw: &str) -> ParsedQuery {
    if let Some(doi) = parse_doi(raw) {
        return ParsedQuery::doi(raw, doi);
    }
    if let Some(isbn) = parse_isbn(raw) {
        return ParsedQuery::isbn(raw, isbn);
    }
    ParsedQuery::free_text(raw)
}
