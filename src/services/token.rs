//! Bearer-token claims decode.
//!
//! The gateway never mints tokens and never verifies signatures locally:
//! the upstream API is the signing authority, and a forged token fails the
//! profile exchange before it can become a session. Local decode only
//! extracts the expiry and identity claims the session store needs.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by an upstream-issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — the upstream user identifier.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Expiry as unix seconds.
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed bearer token: {0}")]
    Malformed(#[from] jsonwebtoken::errors::Error),
}

/// Decode the claims of a bearer token without verifying its signature.
///
/// Expiry is deliberately not validated here; the session store compares
/// `exp` against its own clock so expired tokens are still inspectable.
///
/// # Errors
///
/// Returns an error if the token is not a structurally valid JWT.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::RS256];
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    let data = jsonwebtoken::decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
