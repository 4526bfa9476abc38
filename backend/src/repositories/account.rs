//! Postgres-backed account repository

use super::{AccountRepository, MovieRecord, NewUser, RepoResult, UserRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use movie_accounts_shared::{MovieId, RelationKind, UserId};
use sqlx::PgPool;

/// Account repository over a Postgres pool
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_user(&self, user: NewUser) -> RepoResult<UserRecord> {
        // Single statement: the row either exists with its digest or not at all.
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, password_hashed, time_created)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hashed, time_created, last_login, time_deleted
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hashed)
        .bind(user.time_created)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_active_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hashed, time_created, last_login, time_deleted
            FROM users
            WHERE lower(email) = $1 AND time_deleted IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update_last_login(&self, user_id: UserId, at: DateTime<Utc>) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_login = $1
            WHERE id = $2
            "#,
        )
        .bind(at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn collection(&self, user_id: UserId, kind: RelationKind) -> RepoResult<Vec<MovieRecord>> {
        let movies = sqlx::query_as::<_, MovieRecord>(
            r#"
            SELECT m.id, m.tmdb_id, m.title, m.tagline, m.release_year,
                   m.overview, m.score::DOUBLE PRECISION AS score,
                   m.popularity::DOUBLE PRECISION AS popularity, m.language,
                   m.poster_url, m.trailer_url
            FROM movies m
            JOIN user_movies um ON m.id = um.movie_id
            WHERE um.user_id = $1 AND um.relation_type = $2
            ORDER BY um.time_added, m.id
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn add_to_collection(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        kind: RelationKind,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_movies (user_id, movie_id, relation_type)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, movie_id, relation_type) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_from_collection(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        kind: RelationKind,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_movies
            WHERE user_id = $1 AND movie_id = $2 AND relation_type = $3
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
