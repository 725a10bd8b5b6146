//! Error types for metadata provider operations.

use thiserror::Error;

use crate::source::SourceKind;

/// Errors that can occur while searching a metadata provider.
///
/// An empty result list is not an error; providers return `Ok(vec![])` when
/// the catalog simply has no match.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider could not be reached or refused to answer.
    #[error(
        "provider '{provider}' unavailable: {reason}\n  Suggestion: Check your network connection and try again"
    )]
    Unavailable {
        /// The provider's registry name.
        provider: String,
        /// Human-readable failure description.
        reason: String,
    },

    /// The provider answered with something we could not interpret.
    #[error(
        "provider '{provider}' returned an unexpected response: {reason}\n  Suggestion: Retry later or report the query that triggered this"
    )]
    InvalidResponse {
        /// The provider's registry name.
        provider: String,
        /// What was wrong with the response.
        reason: String,
    },

    /// No registered provider can search this source kind with this query.
    #[error(
        "no provider can search {kind} sources with this query\n  Suggestion: Enter the metadata manually or try a free-text query"
    )]
    NoProvider {
        /// The source kind that was requested.
        kind: SourceKind,
    },
}

impl ProviderError {
    /// Creates an `Unavailable` error.
    #[must_use]
    pub fn unavailable(provider: &str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            provider: provider.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidResponse` error.
    #[must_use]
    pub fn invalid_response(provider: &str, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a `NoProvider` error.
    #[must_use]
    pub fn no_provider(kind: SourceKind) -> Self {
        Self::NoProvider { kind }
    }

    /// Returns true when retrying the same query later could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
