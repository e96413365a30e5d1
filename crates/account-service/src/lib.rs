//! # account-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

// Re-export commonly used types at crate root
pub use dto::{
    AvailabilityResponse, AvailabilityResult, CheckAvailabilityRequest, ClientInfo,
    HealthResponse, LoginRequest, LoginResponse, LogoutRequest, ReadinessResponse,
    RefreshResponse, RefreshTokenRequest, RegisterRequest, UpdateProfileRequest,
    UpdateUserRequest, UserListResponse, UserResponse,
};
pub use services::{
    AuthService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};
