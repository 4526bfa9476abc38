//! Account store: registration, authentication and collections
//!
//! Owns the account invariants on top of an [`AccountRepository`]:
//! input validation, password hashing, duplicate detection and the
//! user-enumeration-safe failure policy of authentication.
//!
//! # Performance
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::PasswordService;
use crate::error::AccountError;
use crate::repositories::{
    AccountRepository, NewUser, RepositoryError, MOVIE_FOREIGN_KEY, USER_FOREIGN_KEY,
};
use chrono::Utc;
use movie_accounts_shared::validation::{self, normalize_email};
use movie_accounts_shared::{AccountDetails, Identity, Movie, MovieId, RelationKind, User, UserId};
use std::sync::Arc;
use tracing::{debug, info, warn};

const REGISTRATION_FAILED: &str = "registration failed";
const AUTHENTICATION_FAILED: &str = "authentication failed";

/// Account store shared by all request handlers
///
/// Cloning is cheap: the repository is behind an `Arc`.
#[derive(Clone)]
pub struct AccountStore {
    repo: Arc<dyn AccountRepository>,
    passwords: PasswordService,
}

impl AccountStore {
    pub fn new(repo: Arc<dyn AccountRepository>, passwords: PasswordService) -> Self {
        Self { repo, passwords }
    }

    /// Get a reference to the underlying repository
    #[inline]
    pub fn repository(&self) -> &dyn AccountRepository {
        self.repo.as_ref()
    }

    /// Register a new user and return the created identity
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AccountError> {
        let checks = validation::require("name", name)
            .and_then(|_| validation::validate_email(email))
            .and_then(|_| validation::require_password(password));
        if let Err(reason) = checks {
            info!(%reason, "Registration rejected");
            return Err(AccountError::Validation(REGISTRATION_FAILED.to_string()));
        }

        let email = normalize_email(email);

        // Soft-deleted accounts keep their email reserved.
        if self.repo.email_exists(&email).await? {
            info!("Registration rejected: email already registered");
            return Err(AccountError::DuplicateAccount);
        }

        let password_hashed = self.passwords.hash_async(password.to_string()).await?;

        // The unique index is authoritative: a concurrent registration can
        // pass the pre-check above and still lose here.
        let record = self
            .repo
            .insert_user(NewUser {
                name: name.trim().to_string(),
                email,
                password_hashed,
                time_created: Utc::now(),
            })
            .await
            .map_err(|err| match err {
                RepositoryError::UniqueViolation => {
                    info!("Registration rejected: email registered concurrently");
                    AccountError::DuplicateAccount
                }
                err => AccountError::Storage(err),
            })?;

        info!(user_id = record.id, "Registered user");
        Ok(record.into())
    }

    /// Verify credentials and return the matching user
    ///
    /// Unknown emails, soft-deleted accounts and wrong passwords all fail
    /// with the same `Validation` error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AccountError> {
        let checks = validation::require("email", email)
            .and_then(|_| validation::require_password(password));
        if let Err(reason) = checks {
            info!(%reason, "Authentication rejected");
            return Err(authentication_failed());
        }

        let email = normalize_email(email);

        let Some(record) = self.repo.find_active_by_email(&email).await? else {
            info!("Authentication failed: no active account");
            return Err(authentication_failed());
        };

        let valid =
            PasswordService::verify_async(password.to_string(), record.password_hashed.clone())
                .await?;
        if !valid {
            info!(user_id = record.id, "Authentication failed: password mismatch");
            return Err(authentication_failed());
        }

        // Detached: neither a failed nor a stalled write may hold up the login.
        let repo = Arc::clone(&self.repo);
        let user_id = record.id;
        tokio::spawn(async move {
            if let Err(err) = repo.update_last_login(user_id, Utc::now()).await {
                warn!(user_id, error = %err, "Failed to update last login");
            }
        });

        info!(user_id = record.id, "Authenticated user");
        Ok(record.into())
    }

    /// Fetch a user's profile with both collections
    pub async fn account_details(&self, email: &str) -> Result<AccountDetails, AccountError> {
        let email = normalize_email(email);

        let record = self
            .repo
            .find_active_by_email(&email)
            .await?
            .ok_or(AccountError::NotFound)?;

        // Either collection failing aborts the whole call.
        let (favorites, watchlist) = tokio::try_join!(
            self.collection(record.id, RelationKind::Favorite),
            self.collection(record.id, RelationKind::Watchlist),
        )?;

        Ok(AccountDetails {
            user: record.into(),
            favorites,
            watchlist,
        })
    }

    /// Add a catalog item to one of the user's collections
    ///
    /// Saving an item that is already present is a no-op.
    pub async fn save_collection(
        &self,
        user: Identity,
        movie_id: MovieId,
        relation_kind: &str,
    ) -> Result<Identity, AccountError> {
        let kind = parse_relation_kind(relation_kind)?;
        self.require_active(&user).await?;

        let added = self
            .repo
            .add_to_collection(user.id, movie_id, kind)
            .await
            .map_err(|err| collection_write_error(err, movie_id))?;

        debug!(user_id = user.id, movie_id, %kind, added, "Saved to collection");
        Ok(user)
    }

    /// Remove a catalog item from one of the user's collections
    ///
    /// Removing an absent item is a no-op.
    pub async fn remove_from_collection(
        &self,
        user: Identity,
        movie_id: MovieId,
        relation_kind: &str,
    ) -> Result<Identity, AccountError> {
        let kind = parse_relation_kind(relation_kind)?;
        self.require_active(&user).await?;

        let removed = self
            .repo
            .remove_from_collection(user.id, movie_id, kind)
            .await?;

        debug!(user_id = user.id, movie_id, %kind, removed, "Removed from collection");
        Ok(user)
    }

    /// The token's user must still exist and not be soft-deleted
    async fn require_active(&self, user: &Identity) -> Result<(), AccountError> {
        match self.repo.find_active_by_email(&normalize_email(&user.email)).await? {
            Some(record) if record.id == user.id => Ok(()),
            _ => {
                info!(user_id = user.id, "Collection change for inactive account");
                Err(AccountError::NotFound)
            }
        }
    }

    async fn collection(&self, user_id: UserId, kind: RelationKind) -> Result<Vec<Movie>, AccountError> {
        let movies = self.repo.collection(user_id, kind).await?;
        Ok(movies.into_iter().map(Movie::from).collect())
    }
}

fn authentication_failed() -> AccountError {
    AccountError::Validation(AUTHENTICATION_FAILED.to_string())
}

fn parse_relation_kind(value: &str) -> Result<RelationKind, AccountError> {
    value
        .parse::<RelationKind>()
        .map_err(|err| AccountError::InvalidArgument(err.to_string()))
}

fn collection_write_error(err: RepositoryError, movie_id: MovieId) -> AccountError {
    if err.violates(MOVIE_FOREIGN_KEY) {
        AccountError::InvalidArgument(format!("unknown movie id {}", movie_id))
    } else if err.violates(USER_FOREIGN_KEY) {
        // Account removed between the activity check and the insert.
        AccountError::NotFound
    } else {
        AccountError::Storage(err)
    }
}
