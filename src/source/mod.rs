//! Source metadata records.
//!
//! A [`SourceRecord`] is the normalized representation of one citable work,
//! independent of the catalog it came from: a book, a journal article, or a
//! website. The variant tag determines which optional fields are meaningful;
//! the only globally required field is the title.
//!
//! Records flow from the provider adapters (or manual entry) into the
//! [`crate::style`] formatter and the [`crate::bibliography`] store.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The kind of citable work a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Book,
    Article,
    Website,
}

impl SourceKind {
    /// Returns the stable string form used in the database and CLI.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Article => "article",
            Self::Website => "website",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book" => Ok(Self::Book),
            "article" => Ok(Self::Article),
            "website" => Ok(Self::Website),
            _ => Err(format!(
                "unknown source kind: {s} (expected book, article, or website)"
            )),
        }
    }
}

/// A published book.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Book {
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub publisher: Option<String>,
    pub place: Option<String>,
}

/// A journal article.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Article {
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub doi: Option<String>,
}

/// A web page or online resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Website {
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub site_name: Option<String>,
    pub url: Option<String>,
    /// Free-text access date, e.g. `"24 Nov 2025"`.
    pub accessed: Option<String>,
}

/// One citable work of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRecord {
    Book(Book),
    Article(Article),
    Website(Website),
}

/// Record-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The title is empty or whitespace-only.
    #[error("title must not be empty\n  Suggestion: Every source needs a title before it can be cited")]
    EmptyTitle,
}

impl SourceRecord {
    /// Returns the kind tag of this record.
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Book(_) => SourceKind::Book,
            Self::Article(_) => SourceKind::Article,
            Self::Website(_) => SourceKind::Website,
        }
    }

    /// Returns the title of the work.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Book(b) => &b.title,
            Self::Article(a) => &a.title,
            Self::Website(w) => &w.title,
        }
    }

    /// Returns the ordered author display names. May be empty.
    #[must_use]
    pub fn authors(&self) -> &[String] {
        match self {
            Self::Book(b) => &b.authors,
            Self::Article(a) => &a.authors,
            Self::Website(w) => &w.authors,
        }
    }

    /// Returns the publication year, if known.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        match self {
            Self::Book(b) => b.year,
            Self::Article(a) => a.year,
            Self::Website(w) => w.year,
        }
    }

    /// Returns the publisher for books, `None` for other kinds.
    #[must_use]
    pub fn publisher(&self) -> Option<&str> {
        match self {
            Self::Book(b) => b.publisher.as_deref(),
            _ => None,
        }
    }

    /// Returns the place of publication for books, `None` for other kinds.
    #[must_use]
    pub fn place(&self) -> Option<&str> {
        match self {
            Self::Book(b) => b.place.as_deref(),
            _ => None,
        }
    }

    /// Returns the journal name for articles, `None` for other kinds.
    #[must_use]
    pub fn journal(&self) -> Option<&str> {
        match self {
            Self::Article(a) => a.journal.as_deref(),
            _ => None,
        }
    }

    /// Returns the journal volume for articles, `None` for other kinds.
    #[must_use]
    pub fn volume(&self) -> Option<&str> {
        match self {
            Self::Article(a) => a.volume.as_deref(),
            _ => None,
        }
    }

    /// Returns the journal issue for articles, `None` for other kinds.
    #[must_use]
    pub fn issue(&self) -> Option<&str> {
        match self {
            Self::Article(a) => a.issue.as_deref(),
            _ => None,
        }
    }

    /// Returns the page range for articles, `None` for other kinds.
    #[must_use]
    pub fn pages(&self) -> Option<&str> {
        match self {
            Self::Article(a) => a.pages.as_deref(),
            _ => None,
        }
    }

    /// Returns the DOI for articles, `None` for other kinds.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        match self {
            Self::Article(a) => a.doi.as_deref(),
            _ => None,
        }
    }

    /// Returns the site name for websites, `None` for other kinds.
    #[must_use]
    pub fn site_name(&self) -> Option<&str> {
        match self {
            Self::Website(w) => w.site_name.as_deref(),
            _ => None,
        }
    }

    /// Returns the URL for websites, `None` for other kinds.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Website(w) => w.url.as_deref(),
            _ => None,
        }
    }

    /// Returns the access date for websites, `None` for other kinds.
    #[must_use]
    pub fn accessed(&self) -> Option<&str> {
        match self {
            Self::Website(w) => w.accessed.as_deref(),
            _ => None,
        }
    }

    /// Checks that the record is fit for formatting and persistence.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] when the title is empty or
    /// whitespace-only. No other field is required.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title().trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Returns the author list as the single `"; "`-joined string used for
    /// persistence. Empty when the record has no authors.
    #[must_use]
    pub fn authors_joined(&self) -> String {
        self.authors().join("; ")
    }
}

/// Splits a stored or user-supplied author string on semicolons,
/// trimming whitespace and dropping empty elements.
#[must_use]
pub fn split_authors(joined: &str) -> Vec<String> {
    joined
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_book() -> SourceRecord {
        SourceRecord::Book(Book {
            title: "The Rust Programming Language".to_string(),
            authors: vec!["Klabnik, Steve".to_string(), "Nichols, Carol".to_string()],
            year: Some(2019),
            publisher: Some("No Starch Press".to_string()),
            place: Some("San Francisco".to_string()),
        })
    }

    // ==================== SourceKind Tests ====================

    #[test]
    fn test_source_kind_as_str() {
        assert_eq!(SourceKind::Book.as_str(), "book");
        assert_eq!(SourceKind::Article.as_str(), "article");
        assert_eq!(SourceKind::Website.as_str(), "website");
    }

    #[test]
    fn test_source_kind_from_str_round_trip() {
        for kind in [SourceKind::Book, SourceKind::Article, SourceKind::Website] {
            let parsed: SourceKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_source_kind_from_str_rejects_unknown() {
        let result: Result<SourceKind, _> = "podcast".parse();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("podcast"));
    }

    #[test]
    fn test_source_kind_display_matches_as_str() {
        assert_eq!(SourceKind::Article.to_string(), "article");
    }

    // ==================== Accessor Tests ====================

    #[test]
    fn test_record_kind_and_title() {
        let record = sample_book();
        assert_eq!(record.kind(), SourceKind::Book);
        assert_eq!(record.title(), "The Rust Programming Language");
    }

    #[test]
    fn test_book_fields_absent_on_article() {
        let record = SourceRecord::Article(Article {
            title: "On Testing".to_string(),
            ..Article::default()
        });
        assert_eq!(record.publisher(), None);
        assert_eq!(record.place(), None);
        assert_eq!(record.site_name(), None);
    }

    #[test]
    fn test_article_fields_present() {
        let record = SourceRecord::Article(Article {
            title: "On Testing".to_string(),
            authors: vec!["Doe, Jane".to_string()],
            year: Some(2021),
            journal: Some("Journal of Testing".to_string()),
            volume: Some("5".to_string()),
            issue: Some("2".to_string()),
            pages: Some("12-34".to_string()),
            doi: Some("10.1234/test.5".to_string()),
        });
        assert_eq!(record.journal(), Some("Journal of Testing"));
        assert_eq!(record.volume(), Some("5"));
        assert_eq!(record.issue(), Some("2"));
        assert_eq!(record.pages(), Some("12-34"));
        assert_eq!(record.doi(), Some("10.1234/test.5"));
    }

    #[test]
    fn test_website_fields_present() {
        let record = SourceRecord::Website(Website {
            title: "Release Notes".to_string(),
            site_name: Some("Rust Blog".to_string()),
            url: Some("https://blog.rust-lang.org".to_string()),
            accessed: Some("3 Mar 2026".to_string()),
            ..Website::default()
        });
        assert_eq!(record.site_name(), Some("Rust Blog"));
        assert_eq!(record.url(), Some("https://blog.rust-lang.org"));
        assert_eq!(record.accessed(), Some("3 Mar 2026"));
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_accepts_titled_record() {
        assert!(sample_book().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let record = SourceRecord::Book(Book::default());
        assert_eq!(record.validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_validate_rejects_whitespace_title() {
        let record = SourceRecord::Website(Website {
            title: "   ".to_string(),
            ..Website::default()
        });
        assert_eq!(record.validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_validation_error_message_mentions_title() {
        let message = ValidationError::EmptyTitle.to_string();
        assert!(message.contains("title"));
        assert!(message.contains("Suggestion"));
    }

    // ==================== Author Join/Split Tests ====================

    #[test]
    fn test_authors_joined_round_trip() {
        let record = sample_book();
        let joined = record.authors_joined();
        assert_eq!(joined, "Klabnik, Steve; Nichols, Carol");
        assert_eq!(split_authors(&joined), record.authors());
    }

    #[test]
    fn test_authors_joined_empty_list() {
        let record = SourceRecord::Book(Book {
            title: "Anonymous Work".to_string(),
            ..Book::default()
        });
        assert_eq!(record.authors_joined(), "");
        assert!(split_authors("").is_empty());
    }

    #[test]
    fn test_split_authors_trims_and_drops_empties() {
        let authors = split_authors("  Doe, Jane ;; Smith, Al ; ");
        assert_eq!(authors, vec!["Doe, Jane", "Smith, Al"]);
    }
}
