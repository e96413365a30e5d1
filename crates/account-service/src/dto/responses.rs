//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize`. The password hash never appears
//! in any response type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use account_core::User;

// ============================================================================
// User Responses
// ============================================================================

/// Safe user summary (no credential material)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            status: user.status.to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Paginated user listing
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Login response: the token pair plus the safe user summary
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
    pub user: UserResponse,
}

impl LoginResponse {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        refresh_expires_in: i64,
        user: UserResponse,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            refresh_expires_in,
            user,
        }
    }
}

/// Refresh response: a new access token only
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl RefreshResponse {
    pub fn new(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

// ============================================================================
// Availability Responses
// ============================================================================

/// Availability verdict for a single field
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResult {
    pub available: bool,
    pub message: String,
}

impl AvailabilityResult {
    pub fn new(available: bool, what: &str) -> Self {
        let message = if available {
            format!("{what} is available")
        } else {
            format!("{what} is already taken")
        };
        Self { available, message }
    }
}

/// Batch availability response
#[derive(Debug, Serialize, Default)]
pub struct AvailabilityResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<AvailabilityResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<AvailabilityResult>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { status: "ok" }
    }
}

/// Readiness response with dependency health
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub database: bool,
    pub cache: bool,
}

impl ReadinessResponse {
    pub fn new(database: bool, cache: bool) -> Self {
        Self {
            status: if database && cache { "ready" } else { "degraded" },
            database,
            cache,
        }
    }
}
