//! FolioCite Core Library
//!
//! This library provides the core functionality for the FolioCite tool,
//! which searches bibliographic catalogs for source metadata, formats
//! citations in five styles, and keeps per-user bibliographies.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`account`] - User accounts owning saved bibliographies
//! - [`bibliography`] - Bibliography persistence, filtering, and export
//! - [`db`] - Database connection and schema management
//! - [`provider`] - Metadata search across catalog providers
//! - [`query`] - Query classification (free text, ISBN, DOI)
//! - [`source`] - Source metadata records (books, articles, websites)
//! - [`style`] - Citation formatting (APA, MLA, Chicago, Harvard, Vancouver)

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod account;
pub mod bibliography;
pub mod db;
pub mod provider;
pub mod query;
pub mod source;
pub mod style;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use account::{AccountError, Accounts, User};
pub use bibliography::{
    Bibliography, BibliographyEntry, BibliographyError, EntryFilter, ExportFormat,
};
pub use db::{Database, DbError, DbErrorKind};
pub use provider::{
    DEFAULT_RESULT_LIMIT, Provider, ProviderError, ProviderRegistry,
    build_default_provider_registry,
};
pub use query::{ParsedQuery, QueryKind, parse_query};
pub use source::{
    Article, Book, SourceKind, SourceRecord, ValidationError, Website, split_authors,
};
pub use style::{Citation, CitationStyle, Segment, citation_segments, format_citation};
