//! In-memory account repository for tests
//!
//! Mirrors the Postgres constraints: unique emails (soft-deleted users
//! included), unique `(user, movie, relation)` entries, and entries may only
//! reference seeded catalog items.

use super::{
    AccountRepository, MovieRecord, NewUser, RepoResult, RepositoryError, UserRecord,
    MOVIE_FOREIGN_KEY, USER_FOREIGN_KEY,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use movie_accounts_shared::{MovieId, RelationKind, UserId};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    entries: Vec<(UserId, MovieId, RelationKind)>,
    movies: HashMap<MovieId, MovieRecord>,
    next_id: UserId,
}

#[derive(Default)]
pub struct InMemoryAccountRepository {
    tables: Mutex<Tables>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a catalog item so collection joins can resolve it
    pub fn insert_movie(&self, id: MovieId, title: &str) {
        let movie = MovieRecord {
            id,
            tmdb_id: id * 10,
            title: title.to_string(),
            tagline: None,
            release_year: Some(1999),
            overview: None,
            score: Some(7.5),
            popularity: Some(12.0),
            language: Some("en".to_string()),
            poster_url: None,
            trailer_url: None,
        };
        self.tables.lock().unwrap().movies.insert(id, movie);
    }

    /// Mark a user as soft-deleted
    pub fn soft_delete(&self, email: &str) {
        let mut tables = self.tables.lock().unwrap();
        for user in tables.users.iter_mut().filter(|u| u.email == email) {
            user.time_deleted = Some(Utc::now());
        }
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn entry_count(&self, user_id: UserId, movie_id: MovieId, kind: RelationKind) -> usize {
        self.tables
            .lock()
            .unwrap()
            .entries
            .iter()
            .filter(|entry| **entry == (user_id, movie_id, kind))
            .count()
    }

    pub fn last_login(&self, email: &str) -> Option<DateTime<Utc>> {
        self.tables
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .and_then(|u| u.last_login)
    }
}

fn foreign_key(name: &str) -> RepositoryError {
    RepositoryError::ForeignKeyViolation {
        constraint: Some(name.to_string()),
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.tables.lock().unwrap().users.iter().any(|u| u.email == email))
    }

    async fn insert_user(&self, user: NewUser) -> RepoResult<UserRecord> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::UniqueViolation);
        }

        tables.next_id += 1;
        let record = UserRecord {
            id: tables.next_id,
            name: user.name,
            email: user.email,
            password_hashed: user.password_hashed,
            time_created: user.time_created,
            last_login: None,
            time_deleted: None,
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn find_active_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email && u.time_deleted.is_none())
            .cloned())
    }

    async fn update_last_login(&self, user_id: UserId, at: DateTime<Utc>) -> RepoResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn collection(&self, user_id: UserId, kind: RelationKind) -> RepoResult<Vec<MovieRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .entries
            .iter()
            .filter(|(user, _, k)| *user == user_id && *k == kind)
            .filter_map(|(_, movie_id, _)| tables.movies.get(movie_id).cloned())
            .collect())
    }

    async fn add_to_collection(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        kind: RelationKind,
    ) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(foreign_key(USER_FOREIGN_KEY));
        }
        if !tables.movies.contains_key(&movie_id) {
            return Err(foreign_key(MOVIE_FOREIGN_KEY));
        }
        let entry = (user_id, movie_id, kind);
        if tables.entries.contains(&entry) {
            return Ok(false);
        }
        tables.entries.push(entry);
        Ok(true)
    }

    async fn remove_from_collection(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        kind: RelationKind,
    ) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.entries.len();
        tables.entries.retain(|entry| *entry != (user_id, movie_id, kind));
        Ok(tables.entries.len() != before)
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
