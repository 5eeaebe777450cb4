use base64::Engine;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::user::User;
use crate::error::{Result, RustyGateError};

/// Number of random bytes in an opaque refresh token
const REFRESH_TOKEN_BYTES: usize = 32;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Email of the subject
    pub email: String,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
    /// Not before (as UTC timestamp)
    pub nbf: usize,
}

impl Claims {
    /// Creates new claims for a user with the given lifetime in seconds
    pub fn new(user_id: String, email: String, ttl_secs: usize) -> Self {
        let now = Utc::now().timestamp() as usize;

        Self {
            sub: user_id,
            email,
            exp: now + ttl_secs,
            iat: now,
            nbf: now,
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        now > self.exp
    }
}

/// Issues and validates session tokens.
///
/// The signing key and access-token lifetime are fixed at construction;
/// there is no ambient global state, so tests inject their own instances.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_ttl: Duration,
}

impl TokenManager {
    /// Creates a new token manager with a secret and access-token lifetime
    pub fn new(secret: &str, access_token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            access_token_ttl,
        }
    }

    /// Issues a signed access token for the user, returning the token and
    /// its expiry timestamp
    pub fn issue_access_token(&self, user: &User) -> Result<(String, DateTime<Utc>)> {
        let expires_at = Utc::now()
            + ChronoDuration::seconds(self.access_token_ttl.as_secs() as i64);
        let claims = Claims::new(
            user.id.clone(),
            user.email.clone(),
            self.access_token_ttl.as_secs() as usize,
        );

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| RustyGateError::TokenError(format!("Failed to generate token: {}", e)))?;

        Ok((token, expires_at))
    }

    /// Issues an opaque refresh token: cryptographically random bytes,
    /// base64url encoded. It carries no claims; its lifetime is applied
    /// only at the delivery layer so the scheme can later be swapped for
    /// server-side rotation without changing the wire shape.
    pub fn issue_refresh_token(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Validates and decodes a signed access token
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| RustyGateError::TokenError(format!("Invalid token: {}", e)))
    }

    /// Extracts claims from a token string
    pub fn get_claims(&self, token: &str) -> Result<Claims> {
        let token_data = self.validate_token(token)?;
        Ok(token_data.claims)
    }

    /// Validates a token and returns the user ID if valid
    pub fn validate_and_get_user_id(&self, token: &str) -> Result<String> {
        let claims = self.get_claims(token)?;

        if claims.is_expired() {
            return Err(RustyGateError::TokenError("Token expired".to_string()));
        }

        Ok(claims.sub)
    }
}

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    if auth_header.starts_with("Bearer ") {
        Some(auth_header[7..].to_string())
    } else {
        None
    }
}

// TODO: Support multiple signing algorithms (RS256, ES256)
