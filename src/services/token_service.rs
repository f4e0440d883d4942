use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::prelude::*;
use std::fmt;
use uuid::Uuid;

use crate::errors::auth::AuthError;
use crate::services::crypto;
use crate::types::db::user;
use crate::types::internal::auth::{Claims, Role};

/// Manages access-token generation/validation and refresh-token material
pub struct TokenService {
    jwt_secret: String,
    refresh_token_secret: String,
    access_expiration_minutes: i64,
    refresh_expiration_days: i64,
}

impl TokenService {
    /// Create a new TokenService
    ///
    /// # Arguments
    /// * `jwt_secret` - Signing secret for access tokens
    /// * `refresh_token_secret` - HMAC key for refresh-token hashing
    /// * `access_expiration_minutes` - Access token TTL
    /// * `refresh_expiration_days` - Refresh token TTL
    pub fn new(
        jwt_secret: String,
        refresh_token_secret: String,
        access_expiration_minutes: i64,
        refresh_expiration_days: i64,
    ) -> Self {
        Self {
            jwt_secret,
            refresh_token_secret,
            access_expiration_minutes,
            refresh_expiration_days,
        }
    }

    /// Generate an access token for the given user
    ///
    /// The claims carry the user id, nik, and role plus a fresh jti, so two
    /// calls for the same user never produce the same token value.
    ///
    /// # Returns
    /// * `Result<(String, String), AuthError>` - The encoded JWT and its jti
    pub fn generate_access_token(&self, user: &user::Model) -> Result<(String, String), AuthError> {
        let role = Role::parse(&user.role)
            .ok_or_else(|| AuthError::internal_error(format!("Unknown stored role: {}", user.role)))?;

        let now = Utc::now().timestamp();
        let expiration = now + (self.access_expiration_minutes * 60);
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user.id.clone(),
            nik: user.nik.clone(),
            role,
            jti: jti.clone(),
            iat: now,
            exp: expiration,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::internal_error(format!("Failed to generate access token: {}", e)))?;

        Ok((token, jti))
    }

    /// Validate an access token signature and expiry, returning the claims
    ///
    /// Revocation is a Session Registry concern; callers must consult it
    /// separately for the returned jti.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            // Check if the error is due to expiration
            if e.to_string().contains("ExpiredSignature") {
                AuthError::expired_token()
            } else {
                AuthError::invalid_token()
            }
        })?;

        Ok(token_data.claims)
    }

    /// Generate a cryptographically secure refresh token
    ///
    /// # Returns
    /// * `String` - A base64-encoded random token (32 bytes)
    pub fn generate_refresh_token(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        general_purpose::STANDARD.encode(random_bytes)
    }

    /// Hash a refresh token using HMAC-SHA256
    ///
    /// Only the hash is persisted; presenting the plaintext token is the
    /// only way to reproduce it.
    pub fn hash_refresh_token(&self, token: &str) -> String {
        crypto::hmac_sha256_token(&self.refresh_token_secret, token)
    }

    /// Get the expiration timestamp for a refresh token issued now
    pub fn refresh_expiration(&self) -> i64 {
        let now = Utc::now().timestamp();
        now + (self.refresh_expiration_days * 24 * 60 * 60)
    }

    /// Access token lifetime in seconds, for response payloads
    pub fn access_expires_in(&self) -> i64 {
        self.access_expiration_minutes * 60
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("access_expiration_minutes", &self.access_expiration_minutes)
            .field("refresh_expiration_days", &self.refresh_expiration_days)
            .finish()
    }
}

impl fmt::Display for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenService {{ access_expiration: {}min, refresh_expiration: {}days }}",
            self.access_expiration_minutes, self.refresh_expiration_days
        )
    }
}
