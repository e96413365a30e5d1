//! Service context - dependency container for services
//!
//! Holds the repository, the token codec, the session manager, and the raw
//! session store. Everything is behind a trait object or `Arc`, so the whole
//! context can be assembled on in-memory fakes in tests.

use std::sync::Arc;

use account_cache::{SessionManager, SessionStore};
use account_common::JwtService;
use account_core::UserRepository;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    user_repo: Arc<dyn UserRepository>,
    jwt_service: Arc<JwtService>,
    session_manager: Arc<SessionManager>,
    store: Arc<dyn SessionStore>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        jwt_service: Arc<JwtService>,
        session_manager: Arc<SessionManager>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            user_repo,
            jwt_service,
            session_manager,
            store,
        }
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the session manager
    pub fn session_manager(&self) -> &SessionManager {
        self.session_manager.as_ref()
    }

    /// Get the raw session store (readiness checks)
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("user_repo", &"dyn UserRepository")
            .field("jwt_service", &self.jwt_service)
            .field("session_manager", &self.session_manager)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    session_manager: Option<Arc<SessionManager>>,
    store: Option<Arc<dyn SessionStore>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            jwt_service: None,
            session_manager: None,
            store: None,
        }
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn session_manager(mut self, manager: Arc<SessionManager>) -> Self {
        self.session_manager = Some(manager);
        self
    }

    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;
        Ok(ServiceContext::new(
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            self.session_manager
                .ok_or_else(|| ServiceError::validation("session_manager is required"))?,
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
