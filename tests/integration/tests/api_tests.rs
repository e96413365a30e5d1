//! HTTP-level tests
//!
//! Drive the full axum app - routes, extractors, middleware, error
//! responses - over in-memory fakes.

use axum::http::{Method, StatusCode};
use serde_json::json;

use integration_tests::helpers::{register_and_login, request, TestEnv};

#[tokio::test]
async fn register_login_and_access_protected_endpoint() {
    let env = TestEnv::new();
    let app = env.app();

    let (access, _refresh) = register_and_login(&app, "alice", "Password123").await;

    let (status, body) = request(&app, Method::GET, "/api/v1/users/profile", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let env = TestEnv::new();
    let app = env.app();

    let (access, _) = register_and_login(&app, "alice", "Password123").await;

    // Flip the last signature byte
    let mut tampered = access.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let (status, body) =
        request(&app, Method::GET, "/api/v1/users/profile", Some(&tampered), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn missing_and_malformed_auth_are_rejected() {
    let env = TestEnv::new();
    let app = env.app();

    let (status, _) = request(&app, Method::GET, "/api/v1/users/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
        request(&app, Method::GET, "/api/v1/users/profile", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_is_not_a_bearer_credential() {
    let env = TestEnv::new();
    let app = env.app();

    let (_, refresh) = register_and_login(&app, "alice", "Password123").await;

    // Presenting the refresh token as a bearer token must fail, and the
    // response must be indistinguishable from any other auth failure
    let (status, body) =
        request(&app, Method::GET, "/api/v1/users/profile", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "Unauthorized");
}

#[tokio::test]
async fn refresh_endpoint_issues_working_access_token() {
    let env = TestEnv::new();
    let app = env.app();

    let (_, refresh) = register_and_login(&app, "alice", "Password123").await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");

    let new_access = body["access_token"].as_str().unwrap();
    let (status, _) =
        request(&app, Method::GET, "/api/v1/users/profile", Some(new_access), None).await;
    assert_eq!(status, StatusCode::OK);

    // The original refresh token was superseded by the rotation
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn logout_revokes_the_access_token() {
    let env = TestEnv::new();
    let app = env.app();

    let (access, refresh) = register_and_login(&app, "alice", "Password123").await;

    let (status, _) = request(
        &app,
        Method::POST,
        "/api/v1/auth/logout",
        Some(&access),
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The same access token is now revoked at the gate
    let (status, body) =
        request(&app, Method::GET, "/api/v1/users/profile", Some(&access), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    // And the refresh token is dead too
    let (status, _) = request(
        &app,
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn auth_failures_share_one_response_body() {
    let env = TestEnv::new();
    let app = env.app();

    let (access, refresh) = register_and_login(&app, "alice", "Password123").await;

    // Revoke the access token
    request(&app, Method::POST, "/api/v1/auth/logout", Some(&access), None).await;

    let mut tampered = access.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    // Revoked, tampered, wrong-type: same status, same body
    let mut bodies = Vec::new();
    for token in [&access, &tampered, &refresh] {
        let (status, body) =
            request(&app, Method::GET, "/api/v1/users/profile", Some(token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
}

#[tokio::test]
async fn login_validation_and_credential_errors() {
    let env = TestEnv::new();
    let app = env.app();

    register_and_login(&app, "alice", "Password123").await;

    // Wrong password: 401
    let (status, _) = request(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "WrongPassword1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Missing fields: 400 with a validation code
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn register_rejects_bad_input() {
    let env = TestEnv::new();
    let app = env.app();

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "not-an-email",
            "password": "Password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Duplicate username conflicts
    register_and_login(&app, "bob", "Password123").await;
    let (status, _) = request(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "username": "bob",
            "email": "bob2@example.com",
            "password": "Password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn availability_endpoints() {
    let env = TestEnv::new();
    let app = env.app();

    register_and_login(&app, "alice", "Password123").await;

    let (status, body) =
        request(&app, Method::GET, "/api/v1/users/check-username/alice", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);

    let (status, body) =
        request(&app, Method::GET, "/api/v1/users/check-username/carol", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], true);

    // Batch check excluding alice's own id keeps her values "available"
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "Password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let alice_id = body["user"]["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/users/check-availability",
        None,
        Some(json!({
            "username": "alice",
            "email": "alice@example.com",
            "exclude_user_id": alice_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"]["available"], true);
    assert_eq!(body["email"]["available"], true);
}

#[tokio::test]
async fn profile_update_and_user_listing() {
    let env = TestEnv::new();
    let app = env.app();

    let (access, _) = register_and_login(&app, "alice", "Password123").await;
    register_and_login(&app, "bob", "Password123").await;

    let (status, body) = request(
        &app,
        Method::PUT,
        "/api/v1/users/profile",
        Some(&access),
        Some(json!({ "username": "alice2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice2");

    // Renaming to an existing username conflicts
    let (status, _) = request(
        &app,
        Method::PUT,
        "/api/v1/users/profile",
        Some(&access),
        Some(json!({ "username": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) =
        request(&app, Method::GET, "/api/v1/users?page=1&page_size=10", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["users"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn public_endpoints_require_no_auth() {
    let env = TestEnv::new();
    let app = env.app();

    register_and_login(&app, "alice", "Password123").await;

    let (status, body) = request(&app, Method::GET, "/api/v1/public/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let id = body["users"][0]["id"].as_i64().unwrap();
    let (status, body) = request(
        &app,
        Method::GET,
        &format!("/api/v1/public/users/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn health_endpoints() {
    let env = TestEnv::new();
    let app = env.app();

    let (status, body) = request(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = request(&app, Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["database"], true);
    assert_eq!(body["cache"], true);
}

#[tokio::test]
async fn admin_crud_round_trip() {
    let env = TestEnv::new();
    let app = env.app();

    let (access, _) = register_and_login(&app, "alice", "Password123").await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(&access),
        Some(json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "Password123",
            "role": "admin",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "admin");
    let carol_id = body["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        Method::PUT,
        &format!("/api/v1/users/{carol_id}"),
        Some(&access),
        Some(json!({ "status": "suspended" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "suspended");

    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/api/v1/users/{carol_id}"),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(
        &app,
        Method::GET,
        &format!("/api/v1/users/{carol_id}"),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
