//! Database repositories
//!
//! `AccountRepository` is the persistence seam of the account store. The
//! Postgres implementation lives in [`account`]; tests use the in-memory
//! implementation in [`memory`].

pub mod account;
#[cfg(test)]
pub mod memory;

pub use account::PgAccountRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use movie_accounts_shared::{Movie, MovieId, RelationKind, User, UserId};
use thiserror::Error;

/// SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Foreign key from `user_movies` to the catalog
pub const MOVIE_FOREIGN_KEY: &str = "user_movies_movie_id_fkey";
/// Foreign key from `user_movies` to `users`
pub const USER_FOREIGN_KEY: &str = "user_movies_user_id_fkey";

/// Repository error type
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write
    #[error("unique constraint violated")]
    UniqueViolation,

    /// A referenced row does not exist; carries the violated constraint
    #[error("foreign key constraint violated: {}", constraint.as_deref().unwrap_or("unnamed"))]
    ForeignKeyViolation { constraint: Option<String> },

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match sqlstate(&err).as_deref() {
            Some(UNIQUE_VIOLATION) => RepositoryError::UniqueViolation,
            Some(FOREIGN_KEY_VIOLATION) => RepositoryError::ForeignKeyViolation {
                constraint: constraint_name(&err),
            },
            _ => RepositoryError::Database(err),
        }
    }
}

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|code| code.into_owned()),
        _ => None,
    }
}

fn constraint_name(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_string),
        _ => None,
    }
}

impl RepositoryError {
    /// Whether this is a foreign key violation of the named constraint
    pub fn violates(&self, name: &str) -> bool {
        matches!(self, RepositoryError::ForeignKeyViolation { constraint: Some(c) } if c == name)
    }
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// User row, including the columns that never leave the store
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hashed: String,
    pub time_created: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub time_deleted: Option<DateTime<Utc>>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            time_created: record.time_created,
            last_login: record.last_login,
        }
    }
}

/// Catalog row joined through `user_movies`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieRecord {
    pub id: MovieId,
    pub tmdb_id: i32,
    pub title: String,
    pub tagline: Option<String>,
    pub release_year: Option<i32>,
    pub overview: Option<String>,
    pub score: Option<f64>,
    pub popularity: Option<f64>,
    pub language: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Self {
            id: record.id,
            tmdb_id: record.tmdb_id,
            title: record.title,
            tagline: record.tagline,
            release_year: record.release_year,
            overview: record.overview,
            score: record.score,
            popularity: record.popularity,
            language: record.language,
            poster_url: record.poster_url,
            trailer_url: record.trailer_url,
        }
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    /// Normalized (trimmed, lowercased) address
    pub email: String,
    pub password_hashed: String,
    pub time_created: DateTime<Utc>,
}

/// Persistence operations backing the account store
///
/// Emails passed in are already normalized. Implementations must enforce
/// email uniqueness and `(user, movie, relation)` uniqueness themselves
/// rather than relying on callers' pre-checks.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Whether any user, soft-deleted or not, holds this email
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Insert a user atomically; `UniqueViolation` if the email is taken
    async fn insert_user(&self, user: NewUser) -> RepoResult<UserRecord>;

    /// Find a user that has not been soft-deleted
    async fn find_active_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>>;

    async fn update_last_login(&self, user_id: UserId, at: DateTime<Utc>) -> RepoResult<()>;

    /// Catalog items in one collection, in insertion order
    async fn collection(&self, user_id: UserId, kind: RelationKind) -> RepoResult<Vec<MovieRecord>>;

    /// Insert an entry, ignoring conflicts; returns whether a row was added
    ///
    /// `ForeignKeyViolation` naming [`MOVIE_FOREIGN_KEY`] if the catalog has
    /// no such movie, or [`USER_FOREIGN_KEY`] if the user row is gone.
    async fn add_to_collection(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        kind: RelationKind,
    ) -> RepoResult<bool>;

    /// Delete an entry; returns whether a row was removed
    async fn remove_from_collection(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        kind: RelationKind,
    ) -> RepoResult<bool>;

    /// Cheap round trip used by readiness checks
    async fn ping(&self) -> RepoResult<()>;
}
