//! JWT token codec
//!
//! Issues and verifies signed, expiring access/refresh token pairs using the
//! `jsonwebtoken` crate. Every token carries a unique `jti` used as the
//! revocation (blacklist) key.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::AppError;

/// Token type discriminator
///
/// Access and refresh tokens share one signing key; the discriminator is the
/// only thing telling them apart, so every consumer must check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user ID
    pub user_id: i64,
    pub username: String,
    pub role: String,
    /// Token-unique identifier (random 128-bit value, hex-encoded);
    /// used as the blacklist key
    pub jti: String,
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Check if this is an access token
    #[must_use]
    pub fn is_access_token(&self) -> bool {
        self.token_type == TokenType::Access
    }

    /// Check if this is a refresh token
    #[must_use]
    pub fn is_refresh_token(&self) -> bool {
        self.token_type == TokenType::Refresh
    }

    /// Remaining lifetime of the token; zero once expired, never negative
    #[must_use]
    pub fn time_remaining(&self) -> Duration {
        let secs = self.exp - Utc::now().timestamp();
        if secs > 0 {
            Duration::seconds(secs)
        } else {
            Duration::zero()
        }
    }
}

/// Token pair returned at issuance, handed to the caller exactly once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

/// JWT service for issuing and verifying token pairs
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: Duration,
    refresh_token_expiry: Duration,
}

impl JwtService {
    /// Create a new JWT service with the given secret and expiry times
    #[must_use]
    pub fn new(secret: &str, access_expire_minutes: i64, refresh_expire_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry: Duration::minutes(access_expire_minutes),
            refresh_token_expiry: Duration::hours(refresh_expire_hours),
        }
    }

    /// Create a JWT service from application configuration
    #[must_use]
    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(
            &config.secret,
            config.access_expire_minutes,
            config.refresh_expire_hours,
        )
    }

    /// Issue an access/refresh token pair for a user
    ///
    /// Both tokens get a fresh random `jti`.
    ///
    /// # Errors
    /// Returns an error if token signing fails
    pub fn issue_pair(
        &self,
        user_id: i64,
        username: &str,
        role: &str,
    ) -> Result<TokenPair, AppError> {
        let access_token = self.encode_token(user_id, username, role, TokenType::Access)?;
        let refresh_token = self.encode_token(user_id, username, role, TokenType::Refresh)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_token_expiry.num_seconds(),
            refresh_expires_in: self.refresh_token_expiry.num_seconds(),
        })
    }

    /// Encode a single signed token
    fn encode_token(
        &self,
        user_id: i64,
        username: &str,
        role: &str,
        token_type: TokenType,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expiry = match token_type {
            TokenType::Access => self.access_token_expiry,
            TokenType::Refresh => self.refresh_token_expiry,
        };

        let claims = Claims {
            user_id,
            username: username.to_string(),
            role: role.to_string(),
            jti: generate_jti(),
            token_type,
            iat: now.timestamp(),
            exp: (now + expiry).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {e}")))
    }

    /// Verify signature, algorithm, and expiry, returning the claims
    ///
    /// # Errors
    /// Returns `TokenExpired` for expired tokens and `InvalidToken` for
    /// anything else (malformed, bad signature, wrong algorithm)
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })?;

        Ok(token_data.claims)
    }

    /// Verify a refresh token specifically
    ///
    /// # Errors
    /// Returns `WrongTokenType` when handed a valid token that is not a
    /// refresh token
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.verify(token)?;

        if !claims.is_refresh_token() {
            return Err(AppError::WrongTokenType);
        }

        Ok(claims)
    }

    /// Remaining lifetime of a verified token
    #[must_use]
    pub fn time_remaining(&self, claims: &Claims) -> Duration {
        claims.time_remaining()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish_non_exhaustive()
    }
}

/// Generate a unique token identifier: a random 128-bit value, hex-encoded
fn generate_jti() -> String {
    Uuid::new_v4().simple().to_string()
}
