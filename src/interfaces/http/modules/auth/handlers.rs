//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{ChangePasswordRequest, LoginRequest, LoginResponse, UserInfo};
use crate::application::UserService;
use crate::interfaces::http::common::{domain_error_status, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many failed attempts")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state
        .user_service
        .login(&request.username, &request.password)
        .await
    {
        Ok(auth) => Ok(Json(ApiResponse::success(LoginResponse {
            token: auth.token,
            token_type: auth.token_type,
            expires_in: auth.expires_in,
            user: UserInfo::from(auth.user),
        }))),
        Err(e) => Err((domain_error_status(&e), Json(ApiResponse::error(e.to_string())))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<ApiResponse<()>> {
    state.user_service.logout(&user.user_id).await;
    Json(ApiResponse::success(()))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user info", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserInfo>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.user_service.get_user_by_id(&user.user_id).await {
        Ok(Some(user)) => Ok(Json(ApiResponse::success(UserInfo::from(user)))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        )),
        Err(e) => Err((domain_error_status(&e), Json(ApiResponse::error(e.to_string())))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "New password too short"),
        (status = 401, description = "Invalid current password")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state
        .user_service
        .change_password(&user.user_id, &request.current_password, &request.new_password)
        .await
    {
        Ok(()) => Ok(Json(ApiResponse::success(()))),
        Err(e) => Err((domain_error_status(&e), Json(ApiResponse::error(e.to_string())))),
    }
}
