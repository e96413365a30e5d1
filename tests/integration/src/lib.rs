//! Integration test support
//!
//! In-memory fakes and app builders so the full stack - services, session
//! manager, and the HTTP router - can be exercised without Postgres or
//! Redis.

pub mod fakes;
pub mod helpers;
