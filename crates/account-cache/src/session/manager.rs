//! Session manager
//!
//! Orchestrates session creation, refresh-token validation, blacklist
//! checks, activity tracking, and logout against the key-value store.
//!
//! Consistency model: the store's last-writer-wins semantics on the session
//! key is the only guarantee. Two concurrent refresh calls holding the same
//! valid refresh token can both pass validation before either overwrites;
//! only the later write's refresh token survives, while both access tokens
//! stay valid until their natural expiry. This window is accepted; no
//! optimistic locking is layered on the session record.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use account_common::{AppError, AppResult, JwtService};

use crate::store::{SessionStore, StoreResult};

/// Key prefix for session records
const SESSION_PREFIX: &str = "session:";
/// Key prefix for blacklisted token ids
const BLACKLIST_PREFIX: &str = "blacklist:";
/// Key prefix for activity markers
const ACTIVE_PREFIX: &str = "active:";
/// Key prefix for cached permissions
const PERMISSIONS_PREFIX: &str = "permissions:";

/// Activity marker TTL (30 minutes)
const ACTIVE_TTL: Duration = Duration::from_secs(30 * 60);
/// Permission cache TTL (1 hour)
const PERMISSIONS_TTL: Duration = Duration::from_secs(60 * 60);

/// One logical logged-in session per user
///
/// Keyed by user id; creating a session for a user who already has one
/// overwrites it (no concurrent multi-device sessions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: i64,
    pub username: String,
    /// The only refresh token currently accepted for this user
    pub refresh_token: String,
    pub device_info: String,
    pub ip_address: String,
    pub user_agent: String,
    pub login_time: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Cached role + permission strings for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionSet {
    pub role: String,
    pub permissions: Vec<String>,
    /// Unix timestamp of the cache write
    pub cached_at: i64,
}

/// Session manager over a key-value store and the token codec
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    jwt: Arc<JwtService>,
    /// Session record TTL; equals the refresh-token lifetime
    session_ttl: Duration,
}

impl SessionManager {
    /// Create a new session manager
    ///
    /// `session_ttl` should equal the refresh-token lifetime so a session
    /// record never outlives the token that can renew it.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, jwt: Arc<JwtService>, session_ttl: Duration) -> Self {
        Self {
            store,
            jwt,
            session_ttl,
        }
    }

    fn session_key(user_id: i64) -> String {
        format!("{SESSION_PREFIX}{user_id}")
    }

    fn blacklist_key(token_id: &str) -> String {
        format!("{BLACKLIST_PREFIX}{token_id}")
    }

    fn active_key(user_id: i64) -> String {
        format!("{ACTIVE_PREFIX}{user_id}")
    }

    fn permissions_key(user_id: i64) -> String {
        format!("{PERMISSIONS_PREFIX}{user_id}")
    }

    /// Create (or overwrite) the session record for a user
    #[allow(clippy::too_many_arguments)]
    pub async fn create_session(
        &self,
        user_id: i64,
        username: &str,
        refresh_token: &str,
        device_info: &str,
        ip_address: &str,
        user_agent: &str,
    ) -> AppResult<()> {
        let now = Utc::now();
        let record = SessionRecord {
            user_id,
            username: username.to_string(),
            refresh_token: refresh_token.to_string(),
            device_info: device_info.to_string(),
            ip_address: ip_address.to_string(),
            user_agent: user_agent.to_string(),
            login_time: now,
            last_activity: now,
        };

        self.write_session(&record).await?;

        debug!(user_id = %user_id, username = %username, "Session created");
        Ok(())
    }

    /// Serialize and store a session record with the full TTL
    async fn write_session(&self, record: &SessionRecord) -> AppResult<()> {
        let payload = serde_json::to_string(record)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize session record: {e}")))?;
        self.store
            .set(&Self::session_key(record.user_id), &payload, self.session_ttl)
            .await?;
        Ok(())
    }

    /// Get the session record for a user
    ///
    /// # Errors
    /// `SessionNotFound` if the record is absent or cannot be deserialized;
    /// `StoreUnavailable` on store failure (fail-closed)
    pub async fn get_session(&self, user_id: i64) -> AppResult<SessionRecord> {
        let payload = self
            .store
            .get(&Self::session_key(user_id))
            .await?
            .ok_or(AppError::SessionNotFound)?;

        serde_json::from_str(&payload).map_err(|e| {
            warn!(user_id = %user_id, error = %e, "Corrupt session record");
            AppError::SessionNotFound
        })
    }

    /// Touch the last-activity timestamp, re-setting the full TTL
    ///
    /// Read-modify-write; callers on best-effort paths ignore the error.
    pub async fn update_last_activity(&self, user_id: i64) -> AppResult<()> {
        let mut record = self.get_session(user_id).await?;
        record.last_activity = Utc::now();
        self.write_session(&record).await
    }

    /// Validate a presented refresh token against the stored session
    ///
    /// Steps: verify the token, check the blacklist, load the session by the
    /// token's subject, then compare the stored refresh token byte-for-byte
    /// with the presented one. The comparison is what rejects a token that a
    /// later refresh or login has already superseded — each user has exactly
    /// one accepted refresh token at a time.
    ///
    /// # Errors
    /// `InvalidToken`/`TokenExpired`/`WrongTokenType` from the codec,
    /// `TokenRevoked` on a blacklist hit, `SessionNotFound`,
    /// `RefreshMismatch`, or `StoreUnavailable` (session lookup is
    /// fail-closed)
    pub async fn validate_refresh(&self, refresh_token: &str) -> AppResult<SessionRecord> {
        let claims = self.jwt.verify_refresh(refresh_token)?;

        if self.is_blacklisted(&claims.jti).await {
            warn!(user_id = %claims.user_id, "Refresh attempt with blacklisted token");
            return Err(AppError::TokenRevoked);
        }

        let record = self.get_session(claims.user_id).await?;

        if record.refresh_token != refresh_token {
            warn!(user_id = %claims.user_id, "Refresh attempt with superseded token");
            return Err(AppError::RefreshMismatch);
        }

        Ok(record)
    }

    /// Blacklist a token id for `ttl`
    ///
    /// The TTL should be the token's remaining lifetime; once it elapses the
    /// entry disappears, which is safe because the token itself is expired
    /// by then. Callers skip the call entirely for ttl <= 0.
    pub async fn blacklist(&self, token_id: &str, ttl: Duration) -> AppResult<()> {
        self.store
            .set(&Self::blacklist_key(token_id), "revoked", ttl)
            .await?;

        debug!(token_id = %token_id, ttl_secs = ttl.as_secs(), "Token blacklisted");
        Ok(())
    }

    /// Check whether a token id is blacklisted
    ///
    /// Fail-open: a store error is logged and treated as "not blacklisted",
    /// favoring availability over strict revocation during a store outage.
    pub async fn is_blacklisted(&self, token_id: &str) -> bool {
        fail_open(
            "blacklist_check",
            self.store.exists(&Self::blacklist_key(token_id)).await,
        )
    }

    /// Mark a user as currently active (30-minute marker)
    pub async fn set_active(&self, user_id: i64) -> AppResult<()> {
        self.store
            .set(
                &Self::active_key(user_id),
                &Utc::now().timestamp().to_string(),
                ACTIVE_TTL,
            )
            .await?;
        Ok(())
    }

    /// Check whether a user is currently active
    ///
    /// Best-effort signal: absence does not imply the session is invalid,
    /// and store errors fail open to false.
    pub async fn is_active(&self, user_id: i64) -> bool {
        fail_open(
            "active_check",
            self.store.exists(&Self::active_key(user_id)).await,
        )
    }

    /// Cache role + permissions for a user (1-hour TTL)
    pub async fn cache_permissions(
        &self,
        user_id: i64,
        role: &str,
        permissions: &[String],
    ) -> AppResult<()> {
        let entry = PermissionSet {
            role: role.to_string(),
            permissions: permissions.to_vec(),
            cached_at: Utc::now().timestamp(),
        };
        let payload = serde_json::to_string(&entry)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize permission set: {e}")))?;

        self.store
            .set(&Self::permissions_key(user_id), &payload, PERMISSIONS_TTL)
            .await?;
        Ok(())
    }

    /// Get the cached permission set for a user
    ///
    /// # Errors
    /// `NotFound` on a cache miss; consumers recompute
    pub async fn get_cached_permissions(&self, user_id: i64) -> AppResult<PermissionSet> {
        let payload = self
            .store
            .get(&Self::permissions_key(user_id))
            .await?
            .ok_or_else(|| AppError::not_found("cached permissions"))?;

        serde_json::from_str(&payload)
            .map_err(|_| AppError::not_found("cached permissions"))
    }

    /// Delete the session record for a user; idempotent
    pub async fn delete_session(&self, user_id: i64) -> AppResult<()> {
        self.store.delete(&Self::session_key(user_id)).await?;
        debug!(user_id = %user_id, "Session deleted");
        Ok(())
    }

    /// Best-effort activity tracking for request-time use
    ///
    /// The single place where session-tracking errors are swallowed: both
    /// calls are logged on failure and never block the caller. A tracking
    /// miss must never fail a request whose token is otherwise valid.
    pub async fn touch(&self, user_id: i64) {
        if let Err(e) = self.update_last_activity(user_id).await {
            debug!(user_id = %user_id, error = %e, "Activity update skipped");
        }
        if let Err(e) = self.set_active(user_id).await {
            debug!(user_id = %user_id, error = %e, "Active marker skipped");
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_ttl", &self.session_ttl)
            .finish_non_exhaustive()
    }
}

/// Fail-open guard for non-critical store checks
///
/// Store errors collapse to `false` and are logged here, keeping the
/// fail-open policy auditable in one place.
fn fail_open(check: &'static str, result: StoreResult<bool>) -> bool {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(check, error = %e, "Store check failed, failing open");
            false
        }
    }
}
