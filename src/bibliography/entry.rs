//! Saved bibliography entry type.

use std::fmt;

use sqlx::FromRow;

use crate::source::{Article, Book, SourceKind, SourceRecord, Website, split_authors};
use crate::style::CitationStyle;

/// A saved bibliography entry, one row of the `bibliography` table.
///
/// Source metadata is stored flattened; [`BibliographyEntry::record`]
/// rebuilds the typed record, ignoring columns that do not apply to the
/// stored kind.
#[derive(Debug, Clone, FromRow)]
pub struct BibliographyEntry {
    /// Unique identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Source kind (stored as text, parsed via `kind()`).
    #[sqlx(rename = "kind")]
    pub kind_str: String,
    /// Source title.
    pub title: String,
    /// Author display names joined with `"; "`. Empty when authorless.
    pub authors: String,
    /// Publication year.
    pub year: Option<i32>,
    /// Publisher name (books).
    pub publisher: Option<String>,
    /// Place of publication (books).
    pub place: Option<String>,
    /// Journal name (articles).
    pub journal: Option<String>,
    /// Volume (articles).
    pub volume: Option<String>,
    /// Issue (articles).
    pub issue: Option<String>,
    /// Page range (articles).
    pub pages: Option<String>,
    /// DOI (articles).
    pub doi: Option<String>,
    /// Site name (websites).
    pub site_name: Option<String>,
    /// URL (websites).
    pub url: Option<String>,
    /// Access date (websites).
    pub accessed: Option<String>,
    /// Citation style chosen at save time (stored as text, parsed via `style()`).
    #[sqlx(rename = "style")]
    pub style_str: String,
    /// Free-form note. Exports never include it.
    pub note: Option<String>,
    /// When the entry was saved.
    pub created_at: String,
}

impl BibliographyEntry {
    /// Returns the parsed source kind.
    ///
    /// Falls back to `Book` if the kind string is invalid.
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        self.kind_str.parse().unwrap_or(SourceKind::Book)
    }

    /// Returns the parsed citation style.
    ///
    /// Falls back to `Apa` if the style string is invalid.
    #[must_use]
    pub fn style(&self) -> CitationStyle {
        self.style_str.parse().unwrap_or(CitationStyle::Apa)
    }

    /// Rebuilds the typed source record from the flattened row.
    #[must_use]
    pub fn record(&self) -> SourceRecord {
        let authors = split_authors(&self.authors);
        match self.kind() {
            SourceKind::Book => SourceRecord::Book(Book {
                title: self.title.clone(),
                authors,
                year: self.year,
                publisher: self.publisher.clone(),
                place: self.place.clone(),
            }),
            SourceKind::Article => SourceRecord::Article(Article {
                title: self.title.clone(),
                authors,
                year: self.year,
                journal: self.journal.clone(),
                volume: self.volume.clone(),
                issue: self.issue.clone(),
                pages: self.pages.clone(),
                doi: self.doi.clone(),
            }),
            SourceKind::Website => SourceRecord::Website(Website {
                title: self.title.clone(),
                authors,
                year: self.year,
                site_name: self.site_name.clone(),
                url: self.url.clone(),
                accessed: self.accessed.clone(),
            }),
        }
    }
}

impl fmt::Display for BibliographyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}, {})",
            self.id,
            self.title,
            self.kind(),
            self.style()
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_entry() -> BibliographyEntry {
        BibliographyEntry {
            id: 1,
            user_id: 1,
            kind_str: "book".to_string(),
            title: "The Selfish Gene".to_string(),
            authors: "Dawkins, Richard".to_string(),
            year: Some(1976),
            publisher: Some("Oxford University Press".to_string()),
            place: Some("Oxford".to_string()),
            journal: None,
            volume: None,
            issue: None,
            pages: None,
            doi: None,
            site_name: None,
            url: None,
            accessed: None,
            style_str: "apa".to_string(),
            note: None,
            created_at: "2026-01-01 10:00:00".to_string(),
        }
    }

    #[test]
    fn test_entry_kind_and_style_parse() {
        let entry = sample_entry();
        assert_eq!(entry.kind(), SourceKind::Book);
        assert_eq!(entry.style(), CitationStyle::Apa);
    }

    #[test]
    fn test_entry_kind_and_style_fallback_on_invalid() {
        let mut entry = sample_entry();
        entry.kind_str = "garbage".to_string();
        entry.style_str = "garbage".to_string();
        assert_eq!(entry.kind(), SourceKind::Book);
        assert_eq!(entry.style(), CitationStyle::Apa);
    }

    #[test]
    fn test_entry_record_rebuilds_book() {
        let entry = sample_entry();
        let record = entry.record();
        assert_eq!(record.kind(), SourceKind::Book);
        assert_eq!(record.title(), "The Selfish Gene");
        assert_eq!(record.authors(), ["Dawkins, Richard".to_string()]);
        assert_eq!(record.publisher(), Some("Oxford University Press"));
        assert_eq!(record.place(), Some("Oxford"));
    }

    #[test]
    fn test_entry_record_rebuilds_article() {
        let mut entry = sample_entry();
        entry.kind_str = "article".to_string();
        entry.title = "Neural networks and physical systems".to_string();
        entry.authors = "Hopfield, John J.".to_string();
        entry.journal = Some("PNAS".to_string());
        entry.volume = Some("79".to_string());
        entry.pages = Some("2554-2558".to_string());

        let record = entry.record();
        assert_eq!(record.kind(), SourceKind::Article);
        assert_eq!(record.journal(), Some("PNAS"));
        assert_eq!(record.volume(), Some("79"));
        // Book-only columns are ignored for article rows.
        assert_eq!(record.publisher(), None);
    }

    #[test]
    fn test_entry_record_rebuilds_website() {
        let mut entry = sample_entry();
        entry.kind_str = "website".to_string();
        entry.site_name = Some("Rust Blog".to_string());
        entry.url = Some("https://blog.rust-lang.org/".to_string());
        entry.accessed = Some("12 Jan 2026".to_string());

        let record = entry.record();
        assert_eq!(record.kind(), SourceKind::Website);
        assert_eq!(record.site_name(), Some("Rust Blog"));
        assert_eq!(record.accessed(), Some("12 Jan 2026"));
    }

    #[test]
    fn test_entry_record_splits_multiple_authors() {
        let mut entry = sample_entry();
        entry.authors = "Matsakis, Niko; Turon, Aaron".to_string();
        let record = entry.record();
        assert_eq!(
            record.authors(),
            [
                "Matsakis, Niko".to_string(),
                "Turon, Aaron".to_string()
            ]
        );
    }

    #[test]
    fn test_entry_record_empty_authors() {
        let mut entry = sample_entry();
        entry.authors = String::new();
        assert!(entry.record().authors().is_empty());
    }

    #[test]
    fn test_entry_display() {
        let entry = sample_entry();
        let display = entry.to_string();
        assert!(display.contains("[1]"));
        assert!(display.contains("The Selfish Gene"));
        assert!(display.contains("book"));
        assert!(display.contains("apa"));
    }
}
