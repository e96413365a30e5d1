//! Test helpers
//!
//! Builds the service context and the full axum app on in-memory fakes, and
//! drives the router with `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use account_api::{create_app, AppState};
use account_cache::{MemoryStore, SessionManager};
use account_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, JwtConfig, JwtService,
    RateLimitConfig, RedisConfig, ServerConfig,
};
use account_service::{ServiceContext, ServiceContextBuilder};

use crate::fakes::InMemoryUserRepository;

/// Refresh-token lifetime used across the tests (matches the 720h default)
pub const SESSION_TTL: Duration = Duration::from_secs(720 * 3600);

/// Test configuration; no environment variables involved
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "account-server-test".to_string(),
            env: Environment::Development,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        redis: RedisConfig {
            url: "redis://unused".to_string(),
            max_connections: 1,
            command_timeout_ms: 1000,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret-key-long-enough".to_string(),
            access_expire_minutes: 30,
            refresh_expire_hours: 720,
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig::default(),
    }
}

/// Everything a test needs: the clock-controllable store, the wired
/// context, and (optionally) the full router
pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub context: ServiceContext,
}

impl TestEnv {
    pub fn new() -> Self {
        let config = test_config();
        let store = Arc::new(MemoryStore::new());
        let jwt = Arc::new(JwtService::from_config(&config.jwt));
        let session_manager = Arc::new(SessionManager::new(store.clone(), jwt.clone(), SESSION_TTL));
        let user_repo = Arc::new(InMemoryUserRepository::new());

        let context = ServiceContextBuilder::new()
            .user_repo(user_repo)
            .jwt_service(jwt)
            .session_manager(session_manager)
            .store(store.clone())
            .build()
            .expect("context builds on fakes");

        Self { store, context }
    }

    /// Build the full HTTP app over this environment
    pub fn app(&self) -> Router {
        create_app(AppState::new(self.context.clone(), test_config()))
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive one request through the router, returning status and parsed body
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Register and login a user over HTTP, returning (access, refresh) tokens
pub async fn register_and_login(
    app: &Router,
    username: &str,
    password: &str,
) -> (String, String) {
    let (status, _) = request(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({
            "username": username,
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}
