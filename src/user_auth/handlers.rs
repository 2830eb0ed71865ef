use axum::extract::State;
use std::sync::Arc;

use super::models::{AccessRequestDto, LoginRequest, LoginResponse, LogoutRequest, RegisterRequest};
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResult, JsonBody, MessageData, ok};

/// Login user
///
/// POST /v1/auth/login
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued under `data`", body = LoginResponse),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Invalid login credential"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let resp = state.auth.login(req).await?;
    ok("data", resp)
}

/// Logout user
///
/// POST /v1/auth/logout
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Refresh token revoked", body = MessageData),
        (status = 400, description = "Malformed body")
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LogoutRequest>,
) -> ApiResult<MessageData> {
    state.auth.logout(req).await?;
    ok("data", MessageData::success("Logout successful"))
}

/// Register a new user
///
/// POST /v1/auth/register
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = MessageData),
        (status = 400, description = "Malformed body or wrong secret code"),
        (status = 409, description = "Username or email already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<MessageData> {
    state.auth.register(req).await?;
    ok("data", MessageData::success("User registered successfully"))
}

/// Password reset (not implemented)
///
/// POST /v1/auth/forget-password
#[utoipa::path(
    post,
    path = "/v1/auth/forget-password",
    responses((status = 501, description = "Not implemented")),
    tag = "Auth"
)]
pub async fn forget_password() -> ApiError {
    ApiError::not_implemented("forget password is not implemented")
}

/// Request admin access
///
/// POST /v1/auth/requestAccess
#[utoipa::path(
    post,
    path = "/v1/auth/requestAccess",
    request_body = AccessRequestDto,
    responses(
        (status = 200, description = "Request recorded", body = MessageData),
        (status = 400, description = "Malformed body"),
        (status = 409, description = "A request for this Telegram ID is pending")
    ),
    tag = "Auth"
)]
pub async fn request_access(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AccessRequestDto>,
) -> ApiResult<MessageData> {
    state.auth.request_access(req).await?;
    ok("data", MessageData::success("Request submitted successfully"))
}
