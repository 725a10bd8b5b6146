//! Bibliography persistence.
//!
//! This module provides `SQLite`-backed storage for saved citations. Each
//! entry belongs to one user and remembers the citation style chosen when
//! it was saved, so listings and exports render every entry the way its
//! owner last saw it.
//!
//! # Overview
//!
//! - [`Bibliography`] - Main interface for store operations
//! - [`BibliographyEntry`] - Saved entry with flattened source metadata
//! - [`EntryFilter`] - Kind filter for listings
//! - [`ExportFormat`] - txt / bib / docx export selection
//! - [`BibliographyError`] - Operation error types
//!
//! # Example
//!
//! ```ignore
//! use foliocite_core::bibliography::{Bibliography, EntryFilter};
//! use foliocite_core::style::CitationStyle;
//! use foliocite_core::Database;
//! use std::path::Path;
//!
//! let db = Database::new(Path::new("foliocite.db")).await?;
//! let store = Bibliography::new(db);
//!
//! let id = store.save(user_id, &record, CitationStyle::Apa, None).await?;
//! for entry in store.list(user_id, EntryFilter::All).await? {
//!     println!("{entry}");
//! }
//! ```

mod entry;
mod error;
mod export;

pub use entry::BibliographyEntry;
pub use error::BibliographyError;
pub use export::ExportFormat;

use std::fmt;

use sqlx::Row;
use tracing::instrument;

use crate::db::Database;
use crate::source::{SourceKind, SourceRecord};
use crate::style::CitationStyle;

/// Result type for bibliography operations.
pub type Result<T> = std::result::Result<T, BibliographyError>;

/// Returns `Ok(())` if at least one row was affected; otherwise [`BibliographyError::EntryNotFound`].
fn check_affected(id: i64, rows_affected: u64) -> Result<()> {
    if rows_affected == 0 {
        Err(BibliographyError::EntryNotFound(id))
    } else {
        Ok(())
    }
}

// ==================== EntryFilter ====================

/// Restricts a listing to one source kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFilter {
    /// All saved entries.
    All,
    /// Books only.
    Books,
    /// Journal articles only.
    Articles,
    /// Websites only.
    Websites,
}

impl EntryFilter {
    /// The kind this filter keeps, or `None` for [`EntryFilter::All`].
    #[must_use]
    pub fn kind(&self) -> Option<SourceKind> {
        match self {
            Self::All => None,
            Self::Books => Some(SourceKind::Book),
            Self::Articles => Some(SourceKind::Article),
            Self::Websites => Some(SourceKind::Website),
        }
    }

    /// Returns the filter name as used on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Books => "books",
            Self::Articles => "articles",
            Self::Websites => "websites",
        }
    }
}

impl fmt::Display for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntryFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "books" | "book" => Ok(Self::Books),
            "articles" | "article" => Ok(Self::Articles),
            "websites" | "website" => Ok(Self::Websites),
            other => Err(format!(
                "unknown filter: {other} (expected all, books, articles, or websites)"
            )),
        }
    }
}

// ==================== Bibliography ====================

/// Store for saved bibliography entries.
///
/// All operations are scoped to the owning user; touching another user's
/// entries fails with [`BibliographyError::Forbidden`].
#[derive(Debug, Clone)]
pub struct Bibliography {
    db: Database,
}

impl Bibliography {
    /// Creates a new bibliography store with the given database connection.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Saves a source record to the user's bibliography.
    ///
    /// The record is validated first. The chosen style is stored with the
    /// entry so later listings and exports render it the same way.
    ///
    /// # Returns
    ///
    /// The ID of the newly saved entry.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::Validation`] when the record has no
    /// title, or [`BibliographyError::Database`] if the insert fails.
    #[instrument(skip(self, record, note), fields(user_id, kind = %record.kind(), style = %style))]
    pub async fn save(
        &self,
        user_id: i64,
        record: &SourceRecord,
        style: CitationStyle,
        note: Option<&str>,
    ) -> Result<i64> {
        record.validate()?;

        let result = sqlx::query(
            r"INSERT INTO bibliography (
                user_id,
                kind,
                title,
                authors,
                year,
                publisher,
                place,
                journal,
                volume,
                issue,
                pages,
                doi,
                site_name,
                url,
                accessed,
                style,
                note
              )
              VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
              RETURNING id",
        )
        .bind(user_id)
        .bind(record.kind().as_str())
        .bind(record.title())
        .bind(record.authors_joined())
        .bind(record.year())
        .bind(record.publisher())
        .bind(record.place())
        .bind(record.journal())
        .bind(record.volume())
        .bind(record.issue())
        .bind(record.pages())
        .bind(record.doi())
        .bind(record.site_name())
        .bind(record.url())
        .bind(record.accessed())
        .bind(style.as_str())
        .bind(note)
        .fetch_one(self.db.pool())
        .await?;

        Ok(result.get("id"))
    }

    /// Lists the user's entries, optionally filtered by kind.
    ///
    /// Entries are ordered by title (case-insensitive), then save time, so
    /// listings read like a finished bibliography.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::Database`] if the query fails.
    #[instrument(skip(self), fields(user_id, filter = %filter))]
    pub async fn list(&self, user_id: i64, filter: EntryFilter) -> Result<Vec<BibliographyEntry>> {
        let entries = match filter.kind() {
            Some(kind) => {
                sqlx::query_as::<_, BibliographyEntry>(
                    r"SELECT * FROM bibliography
                      WHERE user_id = ? AND kind = ?
                      ORDER BY title COLLATE NOCASE ASC, created_at ASC, id ASC",
                )
                .bind(user_id)
                .bind(kind.as_str())
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query_as::<_, BibliographyEntry>(
                    r"SELECT * FROM bibliography
                      WHERE user_id = ?
                      ORDER BY title COLLATE NOCASE ASC, created_at ASC, id ASC",
                )
                .bind(user_id)
                .fetch_all(self.db.pool())
                .await?
            }
        };

        Ok(entries)
    }

    /// Fetches one entry, enforcing ownership.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::EntryNotFound`] when no entry has this
    /// ID, or [`BibliographyError::Forbidden`] when it belongs to another
    /// user.
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: i64, id: i64) -> Result<BibliographyEntry> {
        let entry =
            sqlx::query_as::<_, BibliographyEntry>(r"SELECT * FROM bibliography WHERE id = ?")
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?
                .ok_or(BibliographyError::EntryNotFound(id))?;

        if entry.user_id != user_id {
            return Err(BibliographyError::Forbidden { entry_id: id });
        }

        Ok(entry)
    }

    /// Replaces the note on an entry. `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::EntryNotFound`] or
    /// [`BibliographyError::Forbidden`] from the ownership check, or
    /// [`BibliographyError::Database`] if the update fails.
    #[instrument(skip(self, note))]
    pub async fn update_note(&self, user_id: i64, id: i64, note: Option<&str>) -> Result<()> {
        self.get(user_id, id).await?;

        let result = sqlx::query(r"UPDATE bibliography SET note = ? WHERE id = ?")
            .bind(note)
            .bind(id)
            .execute(self.db.pool())
            .await?;

        check_affected(id, result.rows_affected())
    }

    /// Deletes one entry, enforcing ownership.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::EntryNotFound`] when no entry has this
    /// ID, [`BibliographyError::Forbidden`] when it belongs to another
    /// user, or [`BibliographyError::Database`] if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<()> {
        self.get(user_id, id).await?;

        let result = sqlx::query(r"DELETE FROM bibliography WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        check_affected(id, result.rows_affected())
    }

    /// Deletes all of the user's entries.
    ///
    /// # Returns
    ///
    /// The number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::Database`] if the delete fails.
    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query(r"DELETE FROM bibliography WHERE user_id = ?")
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// Exports the user's full bibliography in the given format.
    ///
    /// Every entry renders with the style it was saved under. Notes never
    /// appear in exports.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::Database`] if the listing fails, or
    /// [`BibliographyError::ExportFailed`] if the payload cannot be built.
    #[instrument(skip(self), fields(user_id, format = %format))]
    pub async fn export(&self, user_id: i64, format: ExportFormat) -> Result<Vec<u8>> {
        let entries = self.list(user_id, EntryFilter::All).await?;

        match format {
            ExportFormat::Txt => Ok(export::render_txt(&entries)),
            ExportFormat::Bib => Ok(export::render_bib(&entries)),
            ExportFormat::Docx => export::render_docx(&entries),
        }
    }
}
