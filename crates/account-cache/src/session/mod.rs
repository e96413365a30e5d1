//! Session lifecycle management
//!
//! Session records, the token blacklist, activity markers, and the
//! permission cache, coordinated over the key-value store.

mod manager;

pub use manager::{PermissionSet, SessionManager, SessionRecord};
