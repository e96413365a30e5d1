//! User service
//!
//! Profile management, admin CRUD, listing, and availability checks.

use account_core::{ListQuery, User, UserStatus};
use tracing::{info, instrument};

use crate::dto::{
    AvailabilityResponse, AvailabilityResult, CheckAvailabilityRequest, RegisterRequest,
    UpdateProfileRequest, UpdateUserRequest, UserListResponse, UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get a user by id
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id.to_string()))?;

        Ok(UserResponse::from(&user))
    }

    /// Update the current user's profile
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> ServiceResult<UserResponse> {
        let mut user = self.load(user_id).await?;

        if let Some(username) = request.username {
            self.ensure_username_free(&username, user_id).await?;
            user.set_username(username);
        }
        if let Some(email) = request.email {
            self.ensure_email_free(&email, user_id).await?;
            user.set_email(email);
        }

        self.ctx.user_repo().update(&user).await?;

        Ok(UserResponse::from(&user))
    }

    /// Create a user (admin endpoint); same request shape as registration
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create(&self, request: RegisterRequest) -> ServiceResult<UserResponse> {
        super::AuthService::new(self.ctx).register(request).await
    }

    /// Update any user (admin endpoint)
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i64,
        request: UpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        let mut user = self.load(id).await?;

        if let Some(username) = request.username {
            self.ensure_username_free(&username, id).await?;
            user.set_username(username);
        }
        if let Some(email) = request.email {
            self.ensure_email_free(&email, id).await?;
            user.set_email(email);
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        if let Some(status) = request.status {
            user.status = status
                .parse::<UserStatus>()
                .map_err(ServiceError::validation)?;
        }

        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %id, "User updated");
        Ok(UserResponse::from(&user))
    }

    /// Delete a user
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.ctx.user_repo().delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// List users with page-based pagination
    #[instrument(skip(self))]
    pub async fn list(&self, page: i64, page_size: i64) -> ServiceResult<UserListResponse> {
        let query = ListQuery {
            offset: (page - 1) * page_size,
            limit: page_size,
        };
        let (users, total) = self.ctx.user_repo().list(query).await?;

        Ok(UserListResponse {
            users: users.iter().map(UserResponse::from).collect(),
            total,
            page,
            page_size,
        })
    }

    /// Check whether a username is free
    #[instrument(skip(self))]
    pub async fn check_username_available(&self, username: &str) -> ServiceResult<AvailabilityResult> {
        let exists = self.ctx.user_repo().username_exists(username).await?;
        Ok(AvailabilityResult::new(!exists, "Username"))
    }

    /// Check whether an email is free
    #[instrument(skip(self))]
    pub async fn check_email_available(&self, email: &str) -> ServiceResult<AvailabilityResult> {
        let exists = self.ctx.user_repo().email_exists(email).await?;
        Ok(AvailabilityResult::new(!exists, "Email"))
    }

    /// Batch availability check with optional exclusion of one user id
    #[instrument(skip(self, request))]
    pub async fn check_availability(
        &self,
        request: CheckAvailabilityRequest,
    ) -> ServiceResult<AvailabilityResponse> {
        let mut response = AvailabilityResponse::default();

        if let Some(username) = request.username.filter(|s| !s.is_empty()) {
            let exists = match request.exclude_user_id {
                Some(exclude_id) if exclude_id > 0 => {
                    self.ctx
                        .user_repo()
                        .username_exists_excluding(&username, exclude_id)
                        .await?
                }
                _ => self.ctx.user_repo().username_exists(&username).await?,
            };
            response.username = Some(AvailabilityResult::new(!exists, "Username"));
        }

        if let Some(email) = request.email.filter(|s| !s.is_empty()) {
            let exists = match request.exclude_user_id {
                Some(exclude_id) if exclude_id > 0 => {
                    self.ctx
                        .user_repo()
                        .email_exists_excluding(&email, exclude_id)
                        .await?
                }
                _ => self.ctx.user_repo().email_exists(&email).await?,
            };
            response.email = Some(AvailabilityResult::new(!exists, "Email"));
        }

        Ok(response)
    }

    async fn load(&self, id: i64) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id.to_string()))
    }

    async fn ensure_username_free(&self, username: &str, exclude_id: i64) -> ServiceResult<()> {
        if self
            .ctx
            .user_repo()
            .username_exists_excluding(username, exclude_id)
            .await?
        {
            return Err(ServiceError::conflict("Username already registered"));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, exclude_id: i64) -> ServiceResult<()> {
        if self
            .ctx
            .user_repo()
            .email_exists_excluding(email, exclude_id)
            .await?
        {
            return Err(ServiceError::conflict("Email already registered"));
        }
        Ok(())
    }
}
