//! Data transfer objects for the API boundary

mod requests;
mod responses;

pub use requests::{
    CheckAvailabilityRequest, ClientInfo, LoginRequest, LogoutRequest, RefreshTokenRequest,
    RegisterRequest, UpdateProfileRequest, UpdateUserRequest,
};
pub use responses::{
    AvailabilityResponse, AvailabilityResult, HealthResponse, LoginResponse, ReadinessResponse,
    RefreshResponse, UserListResponse, UserResponse,
};
