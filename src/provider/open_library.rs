//! Open Library book search provider.
//!
//! The [`OpenLibraryProvider`] calls the Open Library search API to find book
//! metadata by free-text query or ISBN. Open Library needs no API key and
//! answers ISBN queries through the same `search.json` endpoint using the
//! `isbn:` field qualifier.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::query::{ParsedQuery, QueryKind};
use crate::source::{Book, SourceKind, SourceRecord};

use super::http_client::build_provider_http_client;
use super::{Provider, ProviderError};

/// Default Open Library base URL.
const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Response fields requested from the search API, to keep payloads small.
const SEARCH_FIELDS: &str = "title,author_name,first_publish_year,publisher";

// ==================== Open Library API Response Types ====================

/// Top-level Open Library search response.
#[derive(Debug, Deserialize)]
pub(crate) struct OpenLibrarySearchResponse {
    #[serde(rename = "numFound")]
    pub num_found: Option<u64>,
    #[serde(default)]
    pub docs: Vec<OpenLibraryDoc>,
}

/// One work entry from the Open Library search response.
#[derive(Debug, Deserialize)]
pub(crate) struct OpenLibraryDoc {
    pub title: Option<String>,
    pub author_name: Option<Vec<String>>,
    pub first_publish_year: Option<i32>,
    pub publisher: Option<Vec<String>>,
}

// ==================== OpenLibraryProvider ====================

/// Searches Open Library for book metadata.
pub struct OpenLibraryProvider {
    client: Client,
    base_url: String,
}

impl OpenLibraryProvider {
    /// Creates a new `OpenLibraryProvider` against the public API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if HTTP client construction fails.
    pub fn new() -> Result<Self, ProviderError> {
        Self::build(DEFAULT_BASE_URL.to_string())
    }

    /// Creates an `OpenLibraryProvider` with a custom base URL (for testing
    /// with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if HTTP client construction fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Self::build(base_url.into())
    }

    fn build(base_url: String) -> Result<Self, ProviderError> {
        let client = build_provider_http_client("open-library")?;
        Ok(Self { client, base_url })
    }
}

impl std::fmt::Debug for OpenLibraryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenLibraryProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for OpenLibraryProvider {
    fn name(&self) -> &'static str {
        "open-library"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Book
    }

    fn can_handle(&self, query: &ParsedQuery) -> bool {
        matches!(query.kind, QueryKind::FreeText | QueryKind::Isbn)
    }

    #[tracing::instrument(skip(self, query), fields(provider = "open-library", query = %query.value))]
    async fn search(
        &self,
        query: &ParsedQuery,
        limit: usize,
    ) -> Result<Vec<SourceRecord>, ProviderError> {
        let q = match query.kind {
            QueryKind::Isbn => format!("isbn:{}", query.value),
            QueryKind::FreeText | QueryKind::Doi => query.value.clone(),
        };
        let url = format!("{}/search.json", self.base_url);
        let limit_param = limit.to_string();

        debug!(api_url = %url, q = %q, "Calling Open Library search API");

        let response = match self
            .client
            .get(&url)
            .query(&[
                ("q", q.as_str()),
                ("limit", limit_param.as_str()),
                ("fields", SEARCH_FIELDS),
            ])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "Open Library request failed");
                return Err(ProviderError::unavailable(
                    "open-library",
                    "Cannot reach Open Library. Check your network connection.",
                ));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let reason = match status.as_u16() {
                429 => "Open Library rate limit exceeded. Try again in a few seconds.".to_string(),
                s if s >= 500 => "Open Library unavailable. Try again later.".to_string(),
                s => format!("Open Library returned HTTP {s}"),
            };
            debug!(status = status.as_u16(), %reason, "Open Library API error");
            return Err(ProviderError::unavailable("open-library", reason));
        }

        let body = match response.json::<OpenLibrarySearchResponse>().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Failed to parse Open Library response JSON");
                return Err(ProviderError::invalid_response(
                    "open-library",
                    "Unexpected Open Library response format",
                ));
            }
        };

        let records: Vec<SourceRecord> = body
            .docs
            .into_iter()
            .filter_map(doc_to_record)
            .take(limit)
            .collect();
        debug!(
            num_found = ?body.num_found,
            returned = records.len(),
            "Open Library search complete"
        );
        Ok(records)
    }
}

// ==================== Mapping Helpers ====================

/// Maps one search doc onto a book record. Docs without a title are dropped.
fn doc_to_record(doc: OpenLibraryDoc) -> Option<SourceRecord> {
    let title = doc.title.map(|t| t.trim().to_string())?;
    if title.is_empty() {
        return None;
    }
    let authors: Vec<String> = doc
        .author_name
        .unwrap_or_default()
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    let publisher = doc
        .publisher
        .unwrap_or_default()
        .into_iter()
        .map(|p| p.trim().to_string())
        .find(|p| !p.is_empty());
    Some(SourceRecord::Book(Book {
        title,
        authors,
        year: doc.first_publish_year,
        publisher,
        place: None,
    }))
}
