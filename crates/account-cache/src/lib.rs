//! # account-cache
//!
//! Redis-backed session layer: the key-value store abstraction, the session
//! manager coordinating session records, the token blacklist, activity
//! markers, and the permission cache.
//!
//! ## Key namespaces
//!
//! - `session:<user_id>` — one session record per user
//! - `blacklist:<token_id>` — revoked token markers, TTL-bounded
//! - `active:<user_id>` — best-effort activity markers
//! - `permissions:<user_id>` — cached role + permission strings

pub mod pool;
pub mod session;
pub mod store;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError};

// Re-export store types
pub use store::{MemoryStore, RedisStore, SessionStore, StoreError, StoreResult};

// Re-export session types
pub use session::{PermissionSet, SessionManager, SessionRecord};
