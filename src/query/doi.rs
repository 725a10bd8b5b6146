//! DOI validation and normalization for search queries.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

/// Full-match pattern for normalized DOIs: `10.XXXX/suffix`.
/// Handles nested registrants like `10.1000.10/example`.
#[allow(clippy::expect_used)]
static DOI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^10\.\d{4,9}(?:\.\d+)*/\S+$").expect("DOI regex is valid") // Static pattern, safe to panic
});

/// Attempts to interpret a search query as a single DOI.
///
/// Accepts bare DOIs (`10.1234/example`), `doi:` prefixes, and
/// `doi.org`/`dx.doi.org` URLs (percent-decoded). Returns the normalized
/// DOI when the input is one valid DOI, `None` otherwise.
///
/// # Examples
///
/// ```
/// use foliocite_core::query::parse_doi;
///
/// assert_eq!(
///     parse_doi("https://doi.org/10.1038/nature12373").as_deref(),
///     Some("10.1038/nature12373")
/// );
/// assert_eq!(parse_doi("rust programming"), None);
/// ```
#[must_use]
pub fn parse_doi(input: &str) -> Option<String> {
    let normalized = normalize_doi(input);

    if !DOI_PATTERN.is_match(&normalized) {
        return None;
    }
    if !is_valid_doi(&normalized) {
        trace!(candidate = %normalized, "DOI-shaped input failed validation");
        return None;
    }

    Some(normalized)
}

/// Normalizes a DOI by stripping prefixes and decoding.
///
/// Strips URL prefixes (`https://doi.org/`, `https://dx.doi.org/`),
/// text prefixes (`doi:`, `DOI:`), URL-decodes, and trims whitespace.
fn normalize_doi(input: &str) -> String {
    let mut doi = input.trim();

    // Strip URL prefixes
    for prefix in &[
        "https://doi.org/",
        "http://doi.org/",
        "https://dx.doi.org/",
        "http://dx.doi.org/",
    ] {
        if let Some(stripped) = doi.strip_prefix(prefix) {
            doi = stripped;
            break;
        }
    }

    // Strip doi: prefix (case-insensitive)
    if doi.len() >= 4 && doi[..4].eq_ignore_ascii_case("doi:") {
        doi = doi[4..].trim_start();
    }

    // URL-decode
    match urlencoding::decode(doi) {
        Ok(decoded) => decoded.trim().to_string(),
        Err(_) => doi.trim().to_string(),
    }
}

/// Validation rules:
/// - Must start with `10.`
/// - First registrant segment must be 4+ digits
/// - Must have a non-empty suffix after `/`
fn is_valid_doi(doi: &str) -> bool {
    if !doi.starts_with("10.") {
        return false;
    }

    let Some(slash_pos) = doi.find('/') else {
        return false;
    };

    let registrant = &doi[3..slash_pos];
    let first_segment = registrant.split('.').next().unwrap_or("");
    if first_segment.len() < 4 || !first_segment.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    !doi[slash_pos + 1..].is_empty()
}
