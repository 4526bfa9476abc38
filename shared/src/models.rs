//! Data models for the movie account subsystem

use crate::errors::ParseRelationKindError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned user identifier
pub type UserId = i32;

/// Catalog item identifier
pub type MovieId = i32;

/// User account as exposed outside the store
///
/// The password digest and soft-deletion marker never leave the repository
/// layer, so they have no field here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub time_created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// The identity claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Minimal catalog item record joined into a user's collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
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

/// Relation between a user and a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Favorite,
    Watchlist,
}

impl RelationKind {
    pub const ALL: [RelationKind; 2] = [RelationKind::Favorite, RelationKind::Watchlist];

    /// Value stored in `user_movies.relation_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Favorite => "favorite",
            RelationKind::Watchlist => "watchlist",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = ParseRelationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "favorite" => Ok(RelationKind::Favorite),
            "watchlist" => Ok(RelationKind::Watchlist),
            other => Err(ParseRelationKindError(other.to_string())),
        }
    }
}

/// A user's profile together with both collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDetails {
    #[serde(flatten)]
    pub user: User,
    pub favorites: Vec<Movie>,
    pub watchlist: Vec<Movie>,
}
