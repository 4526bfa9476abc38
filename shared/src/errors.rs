//! Error types shared by the account backend and its clients

use thiserror::Error;

/// Returned when a string does not name a known collection relation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid collection type: {0:?}")]
pub struct ParseRelationKindError(pub String);

/// Input validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid email format")]
    InvalidEmail,
}
