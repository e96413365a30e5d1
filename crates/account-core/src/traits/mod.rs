//! Capability traits (ports)

mod repositories;

pub use repositories::{ListQuery, RepoResult, UserRepository};
