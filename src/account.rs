//! User accounts that scope bibliographies.
//!
//! Every bibliography entry belongs to one user, and all store operations
//! take the owner's id. This module only manages the account records
//! themselves. Credential verification lives in whatever front end drives
//! this crate; the `users` table just keeps the opaque hash it supplies.

use sqlx::{FromRow, Row};
use thiserror::Error;
use tracing::instrument;

use crate::db::{Database, DbErrorKind, is_unique_violation};

/// Placeholder credential hash for accounts created without a credential.
///
/// No real hash ever equals this value, so front ends that verify
/// credentials cannot sign in to such accounts.
const LOCKED_CREDENTIAL: &str = "!";

/// Result type for account operations.
pub type Result<T> = std::result::Result<T, AccountError>;

/// Errors that can occur during account operations.
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    /// Database operation failed.
    #[error("database error ({kind}): {message}")]
    Database {
        /// Typed classification of the underlying failure.
        kind: DbErrorKind,
        /// Human-readable database error text.
        message: String,
    },

    /// The username is already registered.
    #[error(
        "username '{0}' is already taken\n  Suggestion: Pick a different username or use the existing account"
    )]
    UsernameTaken(String),
}

impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database {
            kind: DbErrorKind::from_sqlx(&err),
            message: err.to_string(),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique identifier.
    pub id: i64,
    /// Unique username.
    pub username: String,
    /// Opaque credential hash (`"!"` when the account is locked).
    pub password_hash: String,
    /// When the account was created.
    pub created_at: String,
}

/// Account store backed by the `users` table.
#[derive(Debug, Clone)]
pub struct Accounts {
    db: Database,
}

impl Accounts {
    /// Creates a new account store with the given database connection.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Registers a new user.
    ///
    /// # Arguments
    ///
    /// * `username` - Unique username for the account
    /// * `password_hash` - Opaque credential hash supplied by the front end
    ///
    /// # Returns
    ///
    /// The ID of the newly created user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UsernameTaken`] when the username is already
    /// registered, or [`AccountError::Database`] if the insert fails.
    #[instrument(skip(self, password_hash), fields(username = %username))]
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<i64> {
        let result = sqlx::query(
            r"INSERT INTO users (username, password_hash)
              VALUES (?, ?)
              RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(row) => Ok(row.get("id")),
            Err(e) if is_unique_violation(&e) => {
                Err(AccountError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Looks up a user by username.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Database`] if the query fails.
    #[instrument(skip(self), fields(username = %username))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r"SELECT id, username, password_hash, created_at
              FROM users
              WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r"SELECT id, username, password_hash, created_at
              FROM users
              WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    /// Returns the user with this username, creating a locked account first
    /// if none exists.
    ///
    /// Created accounts carry the locked credential sentinel, so they are
    /// only usable through interfaces that skip credential checks.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Database`] if lookup or creation fails.
    #[instrument(skip(self), fields(username = %username))]
    pub async fn ensure(&self, username: &str) -> Result<User> {
        if let Some(user) = self.find_by_username(username).await? {
            return Ok(user);
        }

        match self.create(username, LOCKED_CREDENTIAL).await {
            Ok(_) => {}
            // Lost a create race; the account exists either way.
            Err(AccountError::UsernameTaken(_)) => {}
            Err(e) => return Err(e),
        }

        self.find_by_username(username)
            .await?
            .ok_or_else(|| AccountError::Database {
                kind: DbErrorKind::RowNotFound,
                message: format!("user '{username}' missing after create"),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn store() -> Accounts {
        let db = Database::new_in_memory().await.unwrap();
        Accounts::new(db)
    }

    #[tokio::test]
    async fn test_create_returns_increasing_ids() {
        let accounts = store().await;
        let first = accounts.create("alice", "hash-a").await.unwrap();
        let second = accounts.create("bob", "hash-b").await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_create_duplicate_username_is_taken() {
        let accounts = store().await;
        accounts.create("alice", "hash-a").await.unwrap();

        let err = accounts.create("alice", "hash-b").await.unwrap_err();
        assert!(matches!(err, AccountError::UsernameTaken(_)));
        let msg = err.to_string();
        assert!(msg.contains("alice"));
        assert!(msg.contains("Suggestion"));
    }

    #[tokio::test]
    async fn test_find_by_username_roundtrip() {
        let accounts = store().await;
        let id = accounts.create("carol", "hash-c").await.unwrap();

        let user = accounts.find_by_username("carol").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "carol");
        assert_eq!(user.password_hash, "hash-c");
        assert!(!user.created_at.is_empty());

        assert!(accounts.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_roundtrip() {
        let accounts = store().await;
        let id = accounts.create("dave", "hash-d").await.unwrap();

        let user = accounts.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.username, "dave");

        assert!(accounts.find_by_id(id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_creates_locked_account_once() {
        let accounts = store().await;

        let first = accounts.ensure("erin").await.unwrap();
        assert_eq!(first.password_hash, LOCKED_CREDENTIAL);

        let second = accounts.ensure("erin").await.unwrap();
        assert_eq!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_ensure_keeps_existing_credential() {
        let accounts = store().await;
        accounts.create("frank", "real-hash").await.unwrap();

        let user = accounts.ensure("frank").await.unwrap();
        assert_eq!(user.password_hash, "real-hash");
    }
}
