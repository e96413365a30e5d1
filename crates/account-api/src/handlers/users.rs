//! User handlers
//!
//! Endpoints for profile management, admin CRUD, availability checks, and
//! the public (unauthenticated) user surface.

use axum::{
    extract::{Path, State},
    Json,
};
use account_service::{
    AvailabilityResponse, AvailabilityResult, CheckAvailabilityRequest, RegisterRequest,
    UpdateProfileRequest, UpdateUserRequest, UserListResponse, UserResponse, UserService,
};

use crate::extractors::{AuthUser, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

// ============================================================================
// Profile
// ============================================================================

/// Get the current user's profile
///
/// GET /users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_by_id(auth.user_id).await?;
    Ok(Json(response))
}

/// Update the current user's profile
///
/// PUT /users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update_profile(auth.user_id, request).await?;
    Ok(Json(response))
}

// ============================================================================
// Admin CRUD
// ============================================================================

/// List users with pagination
///
/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    pagination: Pagination,
) -> ApiResult<Json<UserListResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.list(pagination.page, pagination.page_size).await?;
    Ok(Json(response))
}

/// Create a user
///
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.create(request).await?;
    Ok(Created(Json(response)))
}

/// Get a user by id
///
/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_by_id(id).await?;
    Ok(Json(response))
}

/// Update a user by id
///
/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update(id, request).await?;
    Ok(Json(response))
}

/// Delete a user by id
///
/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<NoContent> {
    let service = UserService::new(state.service_context());
    service.delete(id).await?;
    Ok(NoContent)
}

// ============================================================================
// Availability checks (public)
// ============================================================================

/// Check whether a username is free
///
/// GET /users/check-username/{username}
pub async fn check_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<AvailabilityResult>> {
    let service = UserService::new(state.service_context());
    let response = service.check_username_available(&username).await?;
    Ok(Json(response))
}

/// Check whether an email is free
///
/// GET /users/check-email/{email}
pub async fn check_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<AvailabilityResult>> {
    let service = UserService::new(state.service_context());
    let response = service.check_email_available(&email).await?;
    Ok(Json(response))
}

/// Batch availability check
///
/// POST /users/check-availability
pub async fn check_availability(
    State(state): State<AppState>,
    Json(request): Json<CheckAvailabilityRequest>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.check_availability(request).await?;
    Ok(Json(response))
}

// ============================================================================
// Public user surface
// ============================================================================

/// Get a user's public summary without authentication
///
/// GET /public/users/{id}
pub async fn public_get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_by_id(id).await?;
    Ok(Json(response))
}

/// List users without authentication
///
/// GET /public/users
pub async fn public_list_users(
    State(state): State<AppState>,
    pagination: Pagination,
) -> ApiResult<Json<UserListResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.list(pagination.page, pagination.page_size).await?;
    Ok(Json(response))
}
