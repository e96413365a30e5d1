//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Keeping this a trait lets the service layer
//! and its tests run against in-memory fakes.

use async_trait::async_trait;

use crate::entities::User;
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Offset/limit pagination for listing queries
#[derive(Debug, Clone, Copy)]
pub struct ListQuery {
    pub offset: i64,
    pub limit: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { offset: 0, limit: 10 }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Check if username is taken by any user other than `exclude_id`
    /// (used by edit forms checking availability of the current value)
    async fn username_exists_excluding(&self, username: &str, exclude_id: i64) -> RepoResult<bool>;

    /// Check if email is taken by any user other than `exclude_id`
    async fn email_exists_excluding(&self, email: &str, exclude_id: i64) -> RepoResult<bool>;

    /// Create a new user, returning the persisted row with its assigned id
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<User>;

    /// Update an existing user
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Delete a user
    async fn delete(&self, id: i64) -> RepoResult<()>;

    /// List users with offset pagination, returning the page and total count
    async fn list(&self, query: ListQuery) -> RepoResult<(Vec<User>, i64)>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: i64) -> RepoResult<Option<String>>;

    /// Connectivity probe for readiness checks
    async fn ping(&self) -> RepoResult<()>;
}
