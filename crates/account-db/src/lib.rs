//! # account-db
//!
//! Database layer implementing the repository traits with PostgreSQL via SQLx.
//!
//! Expects a `users` table:
//!
//! ```sql
//! CREATE TABLE users (
//!     id            BIGSERIAL PRIMARY KEY,
//!     username      TEXT NOT NULL UNIQUE,
//!     email         TEXT NOT NULL UNIQUE,
//!     password_hash TEXT NOT NULL,
//!     role          TEXT NOT NULL DEFAULT 'user',
//!     status        TEXT NOT NULL DEFAULT 'active',
//!     created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! Migration and seeding tooling is external to this crate.

pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::PgUserRepository;
