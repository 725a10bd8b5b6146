//! Crossref journal article search provider.
//!
//! The [`CrossrefProvider`] calls the Crossref REST API to find article
//! metadata. DOI queries hit `works/{doi}` directly; free-text queries go
//! through the `works?query=` search endpoint filtered to journal articles.
//! A DOI that Crossref does not know falls back to the search endpoint so
//! the caller still gets a plain no-results answer instead of an error.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::query::{ParsedQuery, QueryKind};
use crate::source::{Article, SourceKind, SourceRecord};

use super::http_client::build_provider_http_client;
use super::{Provider, ProviderError};

/// Default Crossref API base URL.
const DEFAULT_BASE_URL: &str = "https://api.crossref.org";

/// Search results are restricted to journal articles.
const WORKS_FILTER: &str = "type:journal-article";

const CANNOT_REACH: &str = "Cannot reach Crossref API. Check your network connection.";

// ==================== Crossref API Response Types ====================

/// Response from `works/{doi}`: the message is a single work.
#[derive(Debug, Deserialize)]
pub(crate) struct CrossrefWorkResponse {
    pub status: String,
    pub message: CrossrefWork,
}

/// Response from `works?query=`: the message wraps an item list.
#[derive(Debug, Deserialize)]
pub(crate) struct CrossrefWorksResponse {
    pub status: String,
    pub message: CrossrefWorksMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CrossrefWorksMessage {
    pub items: Option<Vec<CrossrefWork>>,
}

/// One work from the Crossref API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CrossrefWork {
    pub title: Option<Vec<String>>,
    pub author: Option<Vec<CrossrefAuthor>>,
    pub container_title: Option<Vec<String>>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub journal_issue: Option<CrossrefJournalIssue>,
    pub page: Option<String>,
    /// The DOI field is uppercase in the Crossref response.
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    pub published_print: Option<CrossrefDate>,
    pub published_online: Option<CrossrefDate>,
    pub issued: Option<CrossrefDate>,
}

/// An author entry from the Crossref response.
#[derive(Debug, Deserialize)]
pub(crate) struct CrossrefAuthor {
    pub given: Option<String>,
    pub family: Option<String>,
}

/// The `journal-issue` wrapper; some works only carry the issue here.
#[derive(Debug, Deserialize)]
pub(crate) struct CrossrefJournalIssue {
    pub issue: Option<String>,
}

/// A date entry from the Crossref response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CrossrefDate {
    pub date_parts: Option<Vec<Vec<Option<i32>>>>,
}

// ==================== CrossrefProvider ====================

/// Searches Crossref for journal article metadata.
///
/// # Polite Pool
///
/// All requests include a `mailto` query parameter to access Crossref's
/// polite pool, which provides higher rate limits (10 req/s vs 5 req/s).
pub struct CrossrefProvider {
    client: Client,
    base_url: String,
    mailto: String,
}

impl CrossrefProvider {
    /// Creates a new `CrossrefProvider` configured for the Crossref polite pool.
    ///
    /// # Arguments
    ///
    /// * `mailto` - Contact email for Crossref polite pool access
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the mailto value contains control
    /// characters or HTTP client construction fails.
    pub fn new(mailto: impl Into<String>) -> Result<Self, ProviderError> {
        Self::build(mailto.into(), DEFAULT_BASE_URL.to_string())
    }

    /// Creates a `CrossrefProvider` with a custom base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the mailto value contains control
    /// characters or HTTP client construction fails.
    pub fn with_base_url(
        mailto: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Self::build(mailto.into(), base_url.into())
    }

    fn build(mailto: String, base_url: String) -> Result<Self, ProviderError> {
        if mailto.chars().any(|c| c == '\n' || c == '\r' || c == '\0') {
            return Err(ProviderError::unavailable(
                "crossref",
                "mailto contains invalid control characters",
            ));
        }
        let client = build_provider_http_client("crossref")?;

        Ok(Self {
            client,
            base_url,
            mailto,
        })
    }

    async fn lookup_doi(&self, doi: &str) -> Result<Option<SourceRecord>, ProviderError> {
        let url = format!(
            "{}/works/{}?mailto={}",
            self.base_url,
            urlencoding::encode(doi),
            urlencoding::encode(&self.mailto)
        );

        debug!(api_url = %url, "Calling Crossref works API");

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "Crossref API request failed");
                return Err(ProviderError::unavailable("crossref", CANNOT_REACH));
            }
        };
        log_rate_limit(&response);

        let status = response.status();
        if status.as_u16() == 404 {
            debug!(%doi, "DOI not found in Crossref");
            return Ok(None);
        }
        if !status.is_success() {
            debug!(status = status.as_u16(), "Crossref API error");
            return Err(status_error(status));
        }

        let body = match response.json::<CrossrefWorkResponse>().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Failed to parse Crossref response JSON");
                return Err(ProviderError::invalid_response(
                    "crossref",
                    "Unexpected Crossref API response format",
                ));
            }
        };
        if !body.status.eq_ignore_ascii_case("ok") {
            warn!(status = %body.status, "Crossref response status was not ok");
            return Err(ProviderError::invalid_response(
                "crossref",
                "Unexpected Crossref response status",
            ));
        }

        Ok(work_to_record(body.message))
    }

    async fn search_works(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<SourceRecord>, ProviderError> {
        let url = format!("{}/works", self.base_url);
        let rows = limit.to_string();

        debug!(api_url = %url, query = %text, "Calling Crossref search API");

        let response = match self
            .client
            .get(&url)
            .query(&[
                ("query", text),
                ("filter", WORKS_FILTER),
                ("rows", rows.as_str()),
                ("mailto", self.mailto.as_str()),
            ])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "Crossref API request failed");
                return Err(ProviderError::unavailable("crossref", CANNOT_REACH));
            }
        };
        log_rate_limit(&response);

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Crossref API error");
            return Err(status_error(status));
        }

        let body = match response.json::<CrossrefWorksResponse>().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Failed to parse Crossref response JSON");
                return Err(ProviderError::invalid_response(
                    "crossref",
                    "Unexpected Crossref API response format",
                ));
            }
        };
        if !body.status.eq_ignore_ascii_case("ok") {
            warn!(status = %body.status, "Crossref response status was not ok");
            return Err(ProviderError::invalid_response(
                "crossref",
                "Unexpected Crossref response status",
            ));
        }

        let records: Vec<SourceRecord> = body
            .message
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(work_to_record)
            .take(limit)
            .collect();
        debug!(returned = records.len(), "Crossref search complete");
        Ok(records)
    }
}

impl std::fmt::Debug for CrossrefProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossrefProvider")
            .field("base_url", &self.base_url)
            .field("mailto", &self.mailto)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for CrossrefProvider {
    fn name(&self) -> &'static str {
        "crossref"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Article
    }

    fn can_handle(&self, query: &ParsedQuery) -> bool {
        matches!(query.kind, QueryKind::FreeText | QueryKind::Doi)
    }

    #[tracing::instrument(skip(self, query), fields(provider = "crossref", kind = %query.kind, query = %query.value))]
    async fn search(
        &self,
        query: &ParsedQuery,
        limit: usize,
    ) -> Result<Vec<SourceRecord>, ProviderError> {
        if query.kind == QueryKind::Doi {
            if let Some(record) = self.lookup_doi(&query.value).await? {
                return Ok(vec![record]);
            }
            debug!("Falling back to work search for unknown DOI");
        }
        self.search_works(&query.value, limit).await
    }
}

// ==================== Mapping Helpers ====================

fn status_error(status: reqwest::StatusCode) -> ProviderError {
    let reason = match status.as_u16() {
        429 => "Crossref rate limit exceeded. Try again in a few seconds.".to_string(),
        s if s >= 500 => "Crossref API unavailable. Try again later.".to_string(),
        s => format!("Crossref API returned HTTP {s}"),
    };
    ProviderError::unavailable("crossref", reason)
}

fn log_rate_limit(response: &reqwest::Response) {
    if let Some(limit) = response.headers().get("x-rate-limit-limit") {
        debug!(rate_limit = ?limit, "Crossref rate limit");
    }
    if let Some(interval) = response.headers().get("x-rate-limit-interval") {
        debug!(rate_interval = ?interval, "Crossref rate interval");
    }
}

/// Maps one Crossref work onto an article record. Works without a title are
/// dropped.
fn work_to_record(work: CrossrefWork) -> Option<SourceRecord> {
    let title = work
        .title
        .as_ref()
        .and_then(|titles| titles.first())
        .map(|t| t.trim().to_string())?;
    if title.is_empty() {
        return None;
    }

    let authors: Vec<String> = work
        .author
        .unwrap_or_default()
        .iter()
        .map(|a| match (&a.family, &a.given) {
            (Some(f), Some(g)) => format!("{f}, {g}"),
            (Some(f), None) => f.clone(),
            (None, Some(g)) => g.clone(),
            (None, None) => String::new(),
        })
        .filter(|s| !s.is_empty())
        .collect();

    let journal = work
        .container_title
        .unwrap_or_default()
        .into_iter()
        .map(|j| j.trim().to_string())
        .find(|j| !j.is_empty());

    let issue = work
        .issue
        .clone()
        .or_else(|| work.journal_issue.as_ref().and_then(|ji| ji.issue.clone()));

    let year = extract_year(work.published_print.as_ref())
        .or_else(|| extract_year(work.published_online.as_ref()))
        .or_else(|| extract_year(work.issued.as_ref()));

    Some(SourceRecord::Article(Article {
        title,
        authors,
        year,
        journal,
        volume: work.volume,
        issue,
        pages: work.page,
        doi: work.doi,
    }))
}

/// Extracts the year from a Crossref date field.
fn extract_year(date: Option<&CrossrefDate>) -> Option<i32> {
    date.and_then(|d| d.date_parts.as_ref())
        .and_then(|parts| parts.first())
        .and_then(|inner| inner.first())
        .copied()
        .flatten()
}
