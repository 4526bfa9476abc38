//! JWT session token issuance and validation
//!
//! Tokens are HS256-signed and carry the user's identity claims. Each
//! `JwtService` owns its signing secret, so services with different secrets
//! can coexist (e.g. in tests).

use crate::error::AccountError;
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use movie_accounts_shared::{Identity, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub email: String,
    pub name: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            name: claims.name,
            email: claims.email,
        }
    }
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT service for token operations
///
/// Keys are derived once and wrapped in Arc for cheap cloning.
#[derive(Clone)]
pub struct JwtService {
    /// `None` when no secret was configured
    keys: Option<JwtKeys>,
    expiry: Duration,
}

impl JwtService {
    /// Create a new JWT service
    ///
    /// An empty secret yields a service that refuses to issue or validate
    /// tokens instead of signing with an empty key.
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        let keys = (!secret.is_empty()).then(|| JwtKeys::new(secret));
        Self {
            keys,
            expiry: Duration::hours(expiry_hours),
        }
    }

    /// Issue a signed session token for `identity`
    pub fn issue(&self, identity: &Identity) -> Result<String, AccountError> {
        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| AccountError::TokenIssuance("signing secret is not configured".to_string()))?;

        let claims = Claims {
            id: identity.id,
            email: identity.email.clone(),
            name: identity.name.clone(),
            exp: (Utc::now() + self.expiry).timestamp(),
        };

        encode(&Header::default(), &claims, &keys.encoding)
            .map_err(|e| AccountError::TokenIssuance(format!("failed to sign token: {}", e)))
    }

    /// Validate a token's signature and expiry and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("signing secret is not configured"))?;

        let token_data = decode::<Claims>(token, &keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }
}
