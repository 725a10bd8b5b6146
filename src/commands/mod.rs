//! CLI command handlers.

mod bibliography;
mod cite;
mod search;

pub use bibliography::run_bib_command;
pub use cite::run_cite_command;
pub use search::run_search_command;

use anyhow::Result;
use foliocite_core::{Article, Book, SourceKind, SourceRecord, Website, split_authors};

use crate::cli::RecordArgs;

/// Builds a validated source record from command-line metadata fields.
///
/// Repeated `--author` values keep their order; each value may itself be a
/// semicolon-separated list. Fields that do not apply to the chosen kind
/// are ignored.
pub fn record_from_args(record: &RecordArgs) -> Result<SourceRecord> {
    let authors: Vec<String> = record
        .author
        .iter()
        .flat_map(|value| split_authors(value))
        .collect();

    let built = match record.kind {
        SourceKind::Book => SourceRecord::Book(Book {
            title: record.title.clone(),
            authors,
            year: record.year,
            publisher: record.publisher.clone(),
            place: record.place.clone(),
        }),
        SourceKind::Article => SourceRecord::Article(Article {
            title: record.title.clone(),
            authors,
            year: record.year,
            journal: record.journal.clone(),
            volume: record.volume.clone(),
            issue: record.issue.clone(),
            pages: record.pages.clone(),
            doi: record.doi.clone(),
        }),
        SourceKind::Website => SourceRecord::Website(Website {
            title: record.title.clone(),
            authors,
            year: record.year,
            site_name: record.site_name.clone(),
            url: record.url.clone(),
            accessed: record.accessed.clone(),
        }),
    };

    built.validate()?;
    Ok(built)
}
