//! Error types for bibliography operations.

use thiserror::Error;

use crate::db::DbErrorKind;
use crate::source::ValidationError;

/// Errors that can occur during bibliography operations.
#[derive(Debug, Clone, Error)]
pub enum BibliographyError {
    /// The record failed validation before being saved.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Bibliography entry not found.
    #[error(
        "bibliography entry not found: id {0}\n  Suggestion: The entry may have been deleted or the ID is incorrect"
    )]
    EntryNotFound(i64),

    /// The entry belongs to a different user.
    #[error(
        "entry {entry_id} belongs to another user\n  Suggestion: List your own bibliography to find the right entry ID"
    )]
    Forbidden {
        /// ID of the entry that was refused.
        entry_id: i64,
    },

    /// Database operation failed.
    #[error("database error ({kind}): {message}")]
    Database {
        /// Typed classification of the underlying failure.
        kind: DbErrorKind,
        /// Human-readable database error text.
        message: String,
    },

    /// Export rendering or packaging failed.
    #[error("failed to build {format} export: {reason}")]
    ExportFailed {
        /// Export format that was requested.
        format: String,
        /// What went wrong while building it.
        reason: String,
    },
}

impl From<sqlx::Error> for BibliographyError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database {
            kind: DbErrorKind::from_sqlx(&err),
            message: err.to_string(),
        }
    }
}

impl BibliographyError {
    /// Creates an `ExportFailed` error for the given format.
    #[must_use]
    pub fn export_failed(format: &str, reason: impl Into<String>) -> Self {
        Self::ExportFailed {
            format: format.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the typed database error kind, when this is a database error.
    #[must_use]
    pub fn database_kind(&self) -> Option<DbErrorKind> {
        match self {
            Self::Database { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
