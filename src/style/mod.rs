//! Citation formatting.
//!
//! Turns a [`SourceRecord`](crate::source::SourceRecord) into a citation
//! under one of five styles. Formatting is pure: the same record and style
//! always produce the same output, and nothing here touches the network or
//! the database.
//!
//! The main entry point is [`format_citation`], which returns a [`Citation`]
//! holding plain text, an HTML fragment, and a BibTeX entry. Callers that
//! need to drive their own rich-text output (the DOCX exporter does) can ask
//! for the raw [`Segment`] stream via [`citation_segments`] instead.
//!
//! # Example
//!
//! ```
//! use foliocite_core::source::{Book, SourceRecord};
//! use foliocite_core::style::{CitationStyle, format_citation};
//!
//! let record = SourceRecord::Book(Book {
//!     title: "The Selfish Gene".to_string(),
//!     authors: vec!["Dawkins, Richard".to_string()],
//!     year: Some(1976),
//!     publisher: Some("Oxford University Press".to_string()),
//!     place: Some("Oxford".to_string()),
//! });
//!
//! let citation = format_citation(&record, CitationStyle::Apa);
//! assert_eq!(
//!     citation.plain,
//!     "Dawkins, R. (1976). The Selfish Gene. Oxford University Press."
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use crate::source::SourceRecord;

mod authors;
mod bibtex;
mod render;
mod rules;

pub(crate) use bibtex::{BibTexEntry, disambiguate_keys};

/// A supported citation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CitationStyle {
    Apa,
    Mla,
    /// Chicago, author-date variant.
    Chicago,
    Harvard,
    Vancouver,
}

impl CitationStyle {
    /// Every supported style, in display order.
    pub const ALL: [CitationStyle; 5] = [
        CitationStyle::Apa,
        CitationStyle::Mla,
        CitationStyle::Chicago,
        CitationStyle::Harvard,
        CitationStyle::Vancouver,
    ];

    /// Stable lowercase identifier used on the command line and in storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "apa",
            CitationStyle::Mla => "mla",
            CitationStyle::Chicago => "chicago",
            CitationStyle::Harvard => "harvard",
            CitationStyle::Vancouver => "vancouver",
        }
    }

    /// Human-readable style name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "APA",
            CitationStyle::Mla => "MLA",
            CitationStyle::Chicago => "Chicago (author-date)",
            CitationStyle::Harvard => "Harvard",
            CitationStyle::Vancouver => "Vancouver",
        }
    }

    /// Whether this style expects website citations to carry an access date.
    #[must_use]
    pub fn requires_access_date(&self) -> bool {
        rules::rules_for(*self).requires_access_date
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CitationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apa" => Ok(CitationStyle::Apa),
            "mla" => Ok(CitationStyle::Mla),
            "chicago" | "chicago-author-date" => Ok(CitationStyle::Chicago),
            "harvard" => Ok(CitationStyle::Harvard),
            "vancouver" => Ok(CitationStyle::Vancouver),
            other => Err(format!(
                "unknown citation style: {other} (expected apa, mla, chicago, harvard, or vancouver)"
            )),
        }
    }
}

/// One run of citation text, italic or not.
///
/// A citation is a flat list of segments. Concatenating the `text` fields
/// yields the plain rendition; rich-text outputs wrap the italic runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub italic: bool,
}

impl Segment {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            italic: false,
        }
    }

    #[must_use]
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            italic: true,
        }
    }
}

/// A formatted citation in every output flavor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// Plain text, suitable for terminals and `.txt` export.
    pub plain: String,
    /// HTML fragment with italic runs wrapped in `<em>` tags.
    pub html: String,
    /// A BibTeX entry for the record.
    pub bibtex: String,
}

/// Formats `record` under `style`.
#[must_use]
pub fn format_citation(record: &SourceRecord, style: CitationStyle) -> Citation {
    let segments = render::segments(record, style);
    let entry = BibTexEntry::from_record(record);
    Citation {
        plain: render_plain(&segments),
        html: render_html(&segments),
        bibtex: entry.render(),
    }
}

/// The raw segment stream for `record` under `style`, for callers that
/// build their own rich-text output.
#[must_use]
pub fn citation_segments(record: &SourceRecord, style: CitationStyle) -> Vec<Segment> {
    render::segments(record, style)
}

fn render_plain(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

fn render_html(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        let escaped = html_escape::encode_text(&segment.text);
        if segment.italic {
            out.push_str("<em>");
            out.push_str(&escaped);
            out.push_str("</em>");
        } else {
            out.push_str(&escaped);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::{Article, Book, Website};

    fn book() -> SourceRecord {
        SourceRecord::Book(Book {
            title: "The Selfish Gene".to_string(),
            authors: vec!["Dawkins, Richard".to_string()],
            year: Some(1976),
            publisher: Some("Oxford University Press".to_string()),
            place: Some("Oxford".to_string()),
        })
    }

    fn article() -> SourceRecord {
        SourceRecord::Article(Article {
            title: "Neural networks and physical systems".to_string(),
            authors: vec!["Hopfield, John J.".to_string()],
            year: Some(1982),
            journal: Some("PNAS".to_string()),
            volume: Some("79".to_string()),
            issue: Some("8".to_string()),
            pages: Some("2554-2558".to_string()),
            doi: Some("10.1073/pnas.79.8.2554".to_string()),
        })
    }

    fn website() -> SourceRecord {
        SourceRecord::Website(Website {
            title: "Announcing Rust 1.0".to_string(),
            authors: vec![
                "Matsakis, Niko".to_string(),
                "Turon, Aaron".to_string(),
            ],
            year: Some(2015),
            site_name: Some("Rust Blog".to_string()),
            url: Some("https://blog.rust-lang.org/2015/05/15/Rust-1.0.html".to_string()),
            accessed: Some("12 Jan 2026".to_string()),
        })
    }

    // ==================== Style Enum Tests ====================

    #[test]
    fn test_style_round_trips_through_as_str() {
        for style in CitationStyle::ALL {
            assert_eq!(style.as_str().parse::<CitationStyle>().unwrap(), style);
        }
    }

    #[test]
    fn test_style_parse_accepts_chicago_alias() {
        assert_eq!(
            "chicago-author-date".parse::<CitationStyle>().unwrap(),
            CitationStyle::Chicago
        );
    }

    #[test]
    fn test_style_parse_is_case_insensitive() {
        assert_eq!("APA".parse::<CitationStyle>().unwrap(), CitationStyle::Apa);
        assert_eq!(
            " Harvard ".parse::<CitationStyle>().unwrap(),
            CitationStyle::Harvard
        );
    }

    #[test]
    fn test_style_parse_rejects_unknown() {
        let err = "ieee".parse::<CitationStyle>().unwrap_err();
        assert!(err.contains("unknown citation style"));
        assert!(err.contains("ieee"));
    }

    #[test]
    fn test_access_date_expected_by_mla_and_harvard_only() {
        assert!(CitationStyle::Mla.requires_access_date());
        assert!(CitationStyle::Harvard.requires_access_date());
        assert!(!CitationStyle::Apa.requires_access_date());
        assert!(!CitationStyle::Chicago.requires_access_date());
        assert!(!CitationStyle::Vancouver.requires_access_date());
    }

    // ==================== Output Shape Tests ====================

    #[test]
    fn test_plain_text_contains_title() {
        for style in CitationStyle::ALL {
            for record in [book(), article(), website()] {
                let citation = format_citation(&record, style);
                assert!(
                    citation.plain.contains(record.title()),
                    "{style}: {}",
                    citation.plain
                );
            }
        }
    }

    #[test]
    fn test_formatting_is_pure() {
        let record = article();
        let first = format_citation(&record, CitationStyle::Apa);
        let second = format_citation(&record, CitationStyle::Apa);
        assert_eq!(first, second);
    }

    #[test]
    fn test_plain_matches_segment_concatenation() {
        let record = book();
        for style in CitationStyle::ALL {
            let citation = format_citation(&record, style);
            let joined: String = citation_segments(&record, style)
                .iter()
                .map(|s| s.text.as_str())
                .collect();
            assert_eq!(citation.plain, joined);
        }
    }

    #[test]
    fn test_apa_book_title_is_italic_segment() {
        let segments = citation_segments(&book(), CitationStyle::Apa);
        let italic: Vec<&str> = segments
            .iter()
            .filter(|s| s.italic)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(italic, ["The Selfish Gene"]);
    }

    #[test]
    fn test_vancouver_has_no_italic_segments() {
        for record in [book(), article(), website()] {
            let segments = citation_segments(&record, CitationStyle::Vancouver);
            assert!(segments.iter().all(|s| !s.italic));
        }
    }

    #[test]
    fn test_html_wraps_italics_in_em() {
        let citation = format_citation(&book(), CitationStyle::Apa);
        assert!(citation.html.contains("<em>The Selfish Gene</em>"));
    }

    #[test]
    fn test_html_escapes_markup_in_titles() {
        let record = SourceRecord::Book(Book {
            title: "Tags & Trees <in> Rust".to_string(),
            ..Book::default()
        });
        let citation = format_citation(&record, CitationStyle::Apa);
        assert!(citation.html.contains("Tags &amp; Trees &lt;in&gt; Rust"));
        assert!(!citation.html.contains("<in>"));
    }

    #[test]
    fn test_missing_year_renders_nd_except_mla() {
        let record = SourceRecord::Book(Book {
            title: "Undated Manuscript".to_string(),
            authors: vec!["Smith, Jane".to_string()],
            ..Book::default()
        });
        for style in [
            CitationStyle::Apa,
            CitationStyle::Chicago,
            CitationStyle::Harvard,
            CitationStyle::Vancouver,
        ] {
            let citation = format_citation(&record, style);
            assert!(citation.plain.contains("n.d."), "{style}: {}", citation.plain);
        }
        let mla = format_citation(&record, CitationStyle::Mla);
        assert!(!mla.plain.contains("n.d."), "{}", mla.plain);
    }

    #[test]
    fn test_bibtex_included_in_citation() {
        let citation = format_citation(&article(), CitationStyle::Apa);
        assert!(citation.bibtex.starts_with("@article{hopfield1982,"));
        assert!(citation.bibtex.contains("journal = {PNAS}"));
    }
}
