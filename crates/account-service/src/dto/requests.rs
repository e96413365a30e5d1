//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; those carrying user input also
//! implement `Validate` for input validation at the extractor.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request (also used for admin user creation)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    /// Role, defaults to "user" when omitted
    pub role: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Client-supplied device description, stored opaque on the session
    #[serde(default)]
    pub device_info: Option<String>,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request (optional refresh token to revoke alongside the access token)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// Request-scoped client metadata captured by the HTTP layer at login
///
/// All fields are opaque strings; nothing here is validated or trusted.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub device_info: String,
    pub ip_address: String,
    pub user_agent: String,
}

// ============================================================================
// User Requests
// ============================================================================

/// Update current user's profile
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Admin update of any user
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub role: Option<String>,

    /// One of: active, inactive, suspended
    pub status: Option<String>,
}

/// Batch availability check, optionally excluding one user id
/// (edit forms checking whether the current value is still free)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CheckAvailabilityRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub exclude_user_id: Option<i64>,
}
