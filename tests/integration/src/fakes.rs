//! In-memory repository fake
//!
//! Mirrors the PostgreSQL repository's observable behavior closely enough
//! for service-level and HTTP-level tests: id assignment, uniqueness
//! conflicts, and not-found errors.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use account_core::{DomainError, ListQuery, RepoResult, User, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<i64, (User, String)>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        Ok(self.users.lock().get(&id).map(|(user, _)| user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .values()
            .find(|(user, _)| user.username == username)
            .map(|(user, _)| user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .values()
            .find(|(user, _)| user.email == email)
            .map(|(user, _)| user.clone()))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self
            .users
            .lock()
            .values()
            .any(|(user, _)| user.username == username))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.users.lock().values().any(|(user, _)| user.email == email))
    }

    async fn username_exists_excluding(&self, username: &str, exclude_id: i64) -> RepoResult<bool> {
        Ok(self
            .users
            .lock()
            .values()
            .any(|(user, _)| user.username == username && user.id != exclude_id))
    }

    async fn email_exists_excluding(&self, email: &str, exclude_id: i64) -> RepoResult<bool> {
        Ok(self
            .users
            .lock()
            .values()
            .any(|(user, _)| user.email == email && user.id != exclude_id))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<User> {
        let mut users = self.users.lock();

        if users.values().any(|(u, _)| u.username == user.username) {
            return Err(DomainError::UsernameAlreadyExists);
        }
        if users.values().any(|(u, _)| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }

        let mut created = user.clone();
        created.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        users.insert(created.id, (created.clone(), password_hash.to_string()));
        Ok(created)
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut users = self.users.lock();
        match users.get_mut(&user.id) {
            Some((stored, _)) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(DomainError::UserNotFound(user.id)),
        }
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        if self.users.lock().remove(&id).is_none() {
            return Err(DomainError::UserNotFound(id));
        }
        Ok(())
    }

    async fn list(&self, query: ListQuery) -> RepoResult<(Vec<User>, i64)> {
        let users = self.users.lock();
        let total = users.len() as i64;

        let mut all: Vec<User> = users.values().map(|(user, _)| user.clone()).collect();
        all.sort_by_key(|user| user.id);

        let page = all
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn get_password_hash(&self, id: i64) -> RepoResult<Option<String>> {
        Ok(self.users.lock().get(&id).map(|(_, hash)| hash.clone()))
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
