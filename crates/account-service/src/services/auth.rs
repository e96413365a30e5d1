//! Authentication service
//!
//! Handles user registration, login, token refresh, and logout.

use account_common::{hash_password, validate_password_strength, verify_password, AppError};
use account_core::User;
use tracing::{info, instrument, warn};

use crate::dto::{
    ClientInfo, LoginRequest, LoginResponse, LogoutRequest, RefreshResponse, RefreshTokenRequest,
    RegisterRequest, UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<UserResponse> {
        // Validate password strength before touching the database
        validate_password_strength(&request.password).map_err(ServiceError::from)?;

        if self.ctx.user_repo().username_exists(&request.username).await? {
            return Err(ServiceError::conflict("Username already registered"));
        }
        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(ServiceError::conflict("Email already registered"));
        }

        let password_hash = hash_password(&request.password).map_err(ServiceError::from)?;

        let user = User::new(
            request.username,
            request.email,
            request.role.unwrap_or_else(|| "user".to_string()),
        );

        let created = self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %created.id, "User registered successfully");

        Ok(UserResponse::from(&created))
    }

    /// Login with username and password
    ///
    /// The failure message is identical for an unknown username and a wrong
    /// password, so callers cannot enumerate accounts.
    #[instrument(skip(self, request, client), fields(username = %request.username))]
    pub async fn login(
        &self,
        request: LoginRequest,
        client: ClientInfo,
    ) -> ServiceResult<LoginResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: user not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let is_valid =
            verify_password(&request.password, &password_hash).map_err(ServiceError::from)?;
        if !is_valid {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        let pair = self
            .ctx
            .jwt_service()
            .issue_pair(user.id, &user.username, &user.role)
            .map_err(ServiceError::from)?;

        // The session write must succeed; a login without a session record
        // would leave the refresh token unusable
        let device_info = request.device_info.unwrap_or(client.device_info);
        self.ctx
            .session_manager()
            .create_session(
                user.id,
                &user.username,
                &pair.refresh_token,
                &device_info,
                &client.ip_address,
                &client.user_agent,
            )
            .await
            .map_err(ServiceError::from)?;

        // Best-effort bookkeeping; failures are logged, never block the login
        if let Err(e) = self.ctx.session_manager().set_active(user.id).await {
            warn!(user_id = %user.id, error = %e, "Active marker skipped at login");
        }
        let permissions: Vec<String> = Vec::new();
        if let Err(e) = self
            .ctx
            .session_manager()
            .cache_permissions(user.id, &user.role, &permissions)
            .await
        {
            warn!(user_id = %user.id, error = %e, "Permission cache skipped at login");
        }

        info!(user_id = %user.id, "User logged in successfully");

        Ok(LoginResponse::new(
            pair.access_token,
            pair.refresh_token,
            pair.expires_in,
            pair.refresh_expires_in,
            UserResponse::from(&user),
        ))
    }

    /// Exchange a refresh token for a new access token
    ///
    /// Validates the presented refresh token against the stored session,
    /// then overwrites the session with the newly issued refresh token and
    /// the same client metadata. The superseded refresh token is rejected
    /// from then on by the stored-token comparison alone.
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<RefreshResponse> {
        let record = self
            .ctx
            .session_manager()
            .validate_refresh(&request.refresh_token)
            .await
            .map_err(ServiceError::from)?;

        // Reload the user so the reissued tokens carry the current role
        let user = self
            .ctx
            .user_repo()
            .find_by_id(record.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", record.user_id.to_string()))?;

        let pair = self
            .ctx
            .jwt_service()
            .issue_pair(user.id, &user.username, &user.role)
            .map_err(ServiceError::from)?;

        self.ctx
            .session_manager()
            .create_session(
                user.id,
                &user.username,
                &pair.refresh_token,
                &record.device_info,
                &record.ip_address,
                &record.user_agent,
            )
            .await
            .map_err(ServiceError::from)?;

        if let Err(e) = self.ctx.session_manager().update_last_activity(user.id).await {
            warn!(user_id = %user.id, error = %e, "Activity update skipped at refresh");
        }

        info!(user_id = %user.id, "Tokens refreshed successfully");

        Ok(RefreshResponse::new(pair.access_token, pair.expires_in))
    }

    /// Logout: blacklist the presented tokens and delete the session
    ///
    /// The access-token blacklist write and the session delete are surfaced;
    /// the optional refresh-token revocation is best-effort.
    #[instrument(skip(self, access_token, request))]
    pub async fn logout(
        &self,
        user_id: i64,
        access_token: &str,
        request: LogoutRequest,
    ) -> ServiceResult<()> {
        let claims = self.ctx.jwt_service().verify(access_token).map_err(ServiceError::from)?;

        let remaining = claims.time_remaining();
        if remaining > chrono::Duration::zero() {
            self.ctx
                .session_manager()
                .blacklist(&claims.jti, remaining.to_std().unwrap_or_default())
                .await
                .map_err(ServiceError::from)?;
        }

        // Second revocation is best-effort: an invalid or expired refresh
        // token here is not worth failing an otherwise-complete logout
        if let Some(refresh_token) = request.refresh_token {
            if let Ok(refresh_claims) = self.ctx.jwt_service().verify_refresh(&refresh_token) {
                let refresh_remaining = refresh_claims.time_remaining();
                if refresh_remaining > chrono::Duration::zero() {
                    if let Err(e) = self
                        .ctx
                        .session_manager()
                        .blacklist(
                            &refresh_claims.jti,
                            refresh_remaining.to_std().unwrap_or_default(),
                        )
                        .await
                    {
                        warn!(user_id = %user_id, error = %e, "Refresh token blacklist skipped");
                    }
                }
            }
        }

        self.ctx
            .session_manager()
            .delete_session(user_id)
            .await
            .map_err(ServiceError::from)?;

        info!(user_id = %user_id, "User logged out successfully");
        Ok(())
    }
}
