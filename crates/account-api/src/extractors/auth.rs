//! Authentication gate
//!
//! Extracts and validates the bearer token on each request, consults the
//! blacklist, and populates request-scoped identity. This extractor is the
//! only request-time integration point between the stateless token format
//! and the stateful session store.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use account_common::AppError;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub role: String,
    /// The token's unique id (blacklist key)
    pub token_id: String,
    /// The raw access token, needed by logout for self-revocation
    pub token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        // Verify signature, algorithm, and expiry
        let claims = app_state
            .jwt_service()
            .verify(bearer.token())
            .map_err(ApiError::App)?;

        // A refresh token is not a bearer credential; the discriminator is
        // checked at every consumer, not just the refresh endpoint
        if !claims.is_access_token() {
            return Err(ApiError::App(AppError::WrongTokenType));
        }

        // Revocation check against the session store
        if app_state.session_manager().is_blacklisted(&claims.jti).await {
            return Err(ApiError::App(AppError::TokenRevoked));
        }

        // Best-effort activity tracking; a session-tracking miss must never
        // block a request whose token is otherwise valid
        app_state.session_manager().touch(claims.user_id).await;

        Ok(AuthUser {
            user_id: claims.user_id,
            username: claims.username,
            role: claims.role,
            token_id: claims.jti,
            token: bearer.token().to_string(),
        })
    }
}
