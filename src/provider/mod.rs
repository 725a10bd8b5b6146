//! Metadata provider registry and search dispatch.
//!
//! Providers turn a parsed query into candidate source records by calling an
//! external catalog API. Each provider serves exactly one source kind, so the
//! registry picks the provider whose kind matches the search and whose
//! [`Provider::can_handle`] accepts the query shape.
//!
//! # Architecture
//!
//! - [`Provider`]: Async trait implemented per external catalog
//! - [`ProviderRegistry`]: Owns the providers and dispatches searches
//! - [`OpenLibraryProvider`]: Book search via the Open Library API
//! - [`CrossrefProvider`]: Journal article search via the Crossref API
//! - [`ProviderError`]: Unavailable vs. invalid-response classification
//!
//! An empty result list is the normal "no results" answer; errors are
//! reserved for the provider itself misbehaving.
//!
//! # Example
//!
//! ```no_run
//! use foliocite_core::provider::build_default_provider_registry;
//! use foliocite_core::query::parse_query;
//! use foliocite_core::source::SourceKind;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = build_default_provider_registry("you@example.com");
//! let query = parse_query("the selfish gene");
//! let candidates = registry.search(SourceKind::Book, &query, 5).await?;
//! for record in &candidates {
//!     println!("{}", record.title());
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::query::ParsedQuery;
use crate::source::{SourceKind, SourceRecord};

mod crossref;
mod error;
mod http_client;
mod open_library;

pub use crossref::CrossrefProvider;
pub use error::ProviderError;
pub use open_library::OpenLibraryProvider;

/// Default number of candidate records a search returns.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

// ==================== Provider Trait ====================

/// A metadata catalog that can be searched for source records.
///
/// # Object Safety
///
/// This trait is object-safe so the registry can hold `Box<dyn Provider>`
/// values for catalogs registered at startup.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short identifier used in logs and error messages.
    fn name(&self) -> &str;

    /// The source kind this provider produces.
    fn kind(&self) -> SourceKind;

    /// Whether this provider understands the given query shape.
    ///
    /// A book catalog accepts ISBN queries but not DOIs; an article catalog
    /// accepts DOIs but not ISBNs. Free-text queries are accepted broadly.
    fn can_handle(&self, query: &ParsedQuery) -> bool;

    /// Searches the catalog and returns up to `limit` candidate records.
    ///
    /// Returning an empty `Vec` means the catalog answered and found
    /// nothing. Errors mean the catalog could not be queried at all.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the catalog is unreachable, rejects the
    /// request, or responds with a payload that cannot be interpreted.
    async fn search(
        &self,
        query: &ParsedQuery,
        limit: usize,
    ) -> Result<Vec<SourceRecord>, ProviderError>;
}

// ==================== ProviderRegistry ====================

/// Holds the configured providers and routes searches to the right one.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn Provider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Registers a provider. Later registrations do not shadow earlier ones;
    /// the first matching provider wins during dispatch.
    pub fn register(&mut self, provider: Box<dyn Provider>) {
        debug!(provider = provider.name(), kind = %provider.kind(), "Registering provider");
        self.providers.push(provider);
    }

    /// Number of registered providers.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Whether no providers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Searches for candidate records of the given kind.
    ///
    /// Dispatches to the first registered provider whose kind matches and
    /// whose [`Provider::can_handle`] accepts the query.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NoProvider`] when no registered provider
    /// serves this kind and query shape, or the chosen provider's error
    /// when the search itself fails.
    #[tracing::instrument(skip(self, query), fields(kind = %kind, query = %query.value))]
    pub async fn search(
        &self,
        kind: SourceKind,
        query: &ParsedQuery,
        limit: usize,
    ) -> Result<Vec<SourceRecord>, ProviderError> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.kind() == kind && p.can_handle(query))
            .ok_or_else(|| ProviderError::no_provider(kind))?;

        debug!(provider = provider.name(), "Dispatching search");
        provider.search(query, limit).await
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ProviderRegistry")
            .field("providers", &names)
            .finish()
    }
}

/// Builds the standard registry: Open Library for books, Crossref for
/// journal articles.
///
/// A provider whose construction fails is skipped with a warning rather
/// than aborting startup, so the remaining catalogs stay searchable.
#[must_use]
pub fn build_default_provider_registry(crossref_mailto: &str) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    match OpenLibraryProvider::new() {
        Ok(provider) => registry.register(Box::new(provider)),
        Err(e) => warn!(error = %e, "Skipping Open Library provider"),
    }
    match CrossrefProvider::new(crossref_mailto) {
        Ok(provider) => registry.register(Box::new(provider)),
        Err(e) => warn!(error = %e, "Skipping Crossref provider"),
    }

    registry
}
