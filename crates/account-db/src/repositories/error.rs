//! Database error mapping helpers

use account_core::DomainError;

/// Map a SQLx error to a domain error
pub(crate) fn map_db_error(err: sqlx::Error) -> DomainError {
    DomainError::DatabaseError(err.to_string())
}

/// Map a unique-constraint violation on the users table to the matching
/// conflict error, everything else to a database error
pub(crate) fn map_user_conflict(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some(constraint) if constraint.contains("email") => {
                    DomainError::EmailAlreadyExists
                }
                _ => DomainError::UsernameAlreadyExists,
            };
        }
    }
    map_db_error(err)
}

/// Not-found error for a user id
pub(crate) fn user_not_found(id: i64) -> DomainError {
    DomainError::UserNotFound(id)
}
