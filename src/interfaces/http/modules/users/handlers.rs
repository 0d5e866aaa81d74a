//! User management API handlers
//!
//! Admin-only CRUD endpoints. Delegates to `UserService`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    parse_role, CreateUserRequest, ListUsersParams, ResetPasswordRequest, UpdateUserRequest,
    UserDto,
};
use crate::application::UserService;
use crate::domain::{CreateUserDto, GetUserDto, UpdateUserDto};
use crate::interfaces::http::common::{
    domain_error_status, ApiResponse, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::{forbidden, AuthenticatedUser};

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

fn admin_only(user: &AuthenticatedUser) -> Result<(), HandlerError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(forbidden("Admin role required"))
    }
}

fn domain_err(e: crate::domain::DomainError) -> HandlerError {
    (domain_error_status(&e), Json(ApiResponse::error(e.to_string())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "User list", body = PaginatedResponse<UserDto>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<PaginatedResponse<UserDto>>, HandlerError> {
    admin_only(&user)?;

    let role = match params.role.as_deref() {
        Some(raw) => Some(
            parse_role(raw)
                .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))))?,
        ),
        None => None,
    };

    let dto = GetUserDto {
        search: params.search,
        role,
        page: Some(params.page),
        page_size: Some(params.page_size),
        sort_by: params.sort_by,
    };

    let result = state.user_service.list_users(dto).await.map_err(domain_err)?;
    let items: Vec<UserDto> = result.items.into_iter().map(UserDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        items,
        result.total,
        result.page,
        result.limit,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, HandlerError> {
    admin_only(&user)?;

    match state.user_service.get_user_by_id(&id).await.map_err(domain_err)? {
        Some(found) => Ok(Json(ApiResponse::success(UserDto::from(found)))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("User '{}' not found", id))),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), HandlerError> {
    admin_only(&user)?;

    let role = match request.role.as_deref() {
        Some(raw) => Some(
            parse_role(raw)
                .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))))?,
        ),
        None => None,
    };

    let created = state
        .user_service
        .create_user(
            &user.user_id,
            CreateUserDto {
                username: request.username,
                password: request.password,
                full_name: request.full_name,
                role,
            },
        )
        .await
        .map_err(domain_err)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, HandlerError> {
    admin_only(&user)?;

    let role = match request.role.as_deref() {
        Some(raw) => Some(
            parse_role(raw)
                .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))))?,
        ),
        None => None,
    };

    let dto = UpdateUserDto {
        full_name: request.full_name,
        role,
        is_active: request.is_active,
    };

    match state
        .user_service
        .update_user(&user.user_id, &id, dto)
        .await
        .map_err(domain_err)?
    {
        Some(updated) => Ok(Json(ApiResponse::success(UserDto::from(updated)))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("User '{}' not found", id))),
        )),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "Cannot delete the default admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, HandlerError> {
    admin_only(&user)?;

    state
        .user_service
        .delete_user(&user.user_id, &id)
        .await
        .map_err(domain_err)?;

    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/reset-password",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 404, description = "Not found")
    )
)]
pub async fn reset_password(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, HandlerError> {
    admin_only(&user)?;

    state
        .user_service
        .reset_password(&user.user_id, &id, &request.new_password)
        .await
        .map_err(domain_err)?;

    Ok(Json(ApiResponse::success(())))
}
