//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{auth, health, users};
use crate::state::AppState;

/// Create the main API router (excluding health, which bypasses rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(public_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
}

/// User routes: profile, admin CRUD, and availability checks
fn user_routes() -> Router<AppState> {
    Router::new()
        // Profile (authenticated)
        .route("/users/profile", get(users::get_profile))
        .route("/users/profile", put(users::update_profile))
        // Admin CRUD (authenticated)
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id", put(users::update_user))
        .route("/users/:id", delete(users::delete_user))
        // Availability checks (public)
        .route("/users/check-username/:username", get(users::check_username))
        .route("/users/check-email/:email", get(users::check_email))
        .route("/users/check-availability", post(users::check_availability))
}

/// Public user routes (no authentication required)
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/public/users", get(users::public_list_users))
        .route("/public/users/:id", get(users::public_get_user))
}
