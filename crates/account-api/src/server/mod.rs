//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use account_cache::{RedisStore, SessionManager, SessionStore};
use account_common::{AppConfig, AppError, JwtService};
use account_db::{create_pool, DatabaseConfig, PgUserRepository};
use account_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes sit outside the rate-limited API router.
pub fn create_app(state: AppState) -> Router {
    let config = state.config().clone();
    let api = apply_middleware(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );

    Router::new()
        .merge(health_routes())
        .merge(api)
        .with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Create the Redis-backed session store
    info!("Connecting to Redis...");
    let store: Arc<dyn SessionStore> = Arc::new(
        RedisStore::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?,
    );
    info!("Redis connection established");

    // Token codec
    let jwt_service = Arc::new(JwtService::from_config(&config.jwt));

    // Session manager; session TTL tracks the refresh-token lifetime
    let session_ttl = Duration::from_secs(config.jwt.refresh_expire_hours as u64 * 3600);
    let session_manager = Arc::new(SessionManager::new(
        store.clone(),
        jwt_service.clone(),
        session_ttl,
    ));

    // Repositories
    let user_repo = Arc::new(PgUserRepository::new(pool));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .user_repo(user_repo)
        .jwt_service(jwt_service)
        .session_manager(session_manager)
        .store(store)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
