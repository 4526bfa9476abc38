//! Movie Accounts Shared Library
//!
//! This crate contains the domain models and wire types shared between the
//! account backend and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{AccountDetails, Identity, Movie, MovieId, RelationKind, User, UserId};
pub use types::*;
