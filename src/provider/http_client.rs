//! Shared HTTP client construction policy for providers.
//!
//! This module centralizes provider networking defaults so catalog providers
//! stay consistent on timeout, user-agent, and compression.

use std::time::Duration;

use reqwest::Client;

use super::ProviderError;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Builds the single shared provider user-agent string (no per-provider name
/// in the header).
///
/// Catalog APIs ask automated clients to identify themselves; all providers
/// share one string so traffic is not fingerprintable per catalog.
#[must_use]
pub fn standard_user_agent() -> String {
    format!(
        "foliocite/{} (citation metadata search; +https://github.com/foliocite/foliocite)",
        env!("CARGO_PKG_VERSION")
    )
}

/// Builds a provider HTTP client using shared project policy.
///
/// `provider_name` is used only for error messages, not in the User-Agent
/// header.
///
/// # Errors
///
/// Returns [`ProviderError`] when client construction fails.
pub fn build_provider_http_client(provider_name: &str) -> Result<Client, ProviderError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .user_agent(standard_user_agent())
        .gzip(true)
        .build()
        .map_err(|error| {
            ProviderError::unavailable(
                provider_name,
                format!("HTTP client construction failed: {error}"),
            )
        })
}
