//! API request and response types

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

/// Registration request
///
/// Missing fields deserialize as empty so they are rejected by validation
/// rather than by the JSON decoder.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "empty_secret")]
    pub password: SecretString,
}

/// Authentication request
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default = "empty_secret")]
    pub password: SecretString,
}

/// Response to registration and authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    /// Signed session token, present only on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
}

impl AuthResponse {
    pub fn success(message: impl Into<String>, jwt: String) -> Self {
        Self {
            success: true,
            message: message.into(),
            jwt: Some(jwt),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            jwt: None,
        }
    }
}

/// Add or remove a catalog item from one of the user's collections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRequest {
    pub movie_id: i32,
    /// Relation kind; validated by the store so unknown values get a clear error
    pub collection: String,
}

/// Result of a collection mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResponse {
    pub success: bool,
    pub message: String,
}
