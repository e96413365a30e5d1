//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use account_core::{User, UserStatus};

/// Database model for the users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role,
            // Unknown status values in the row degrade to Active rather
            // than failing the whole read
            status: model.status.parse().unwrap_or(UserStatus::Active),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
