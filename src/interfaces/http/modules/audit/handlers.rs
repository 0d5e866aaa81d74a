//! Audit log API handlers — admin only

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;

use super::dto::{AuditListParams, AuditLogDto};
use crate::application::AuditService;
use crate::interfaces::http::common::{domain_error_status, ApiResponse};
use crate::interfaces::http::middleware::{forbidden, AuthenticatedUser};

#[derive(Clone)]
pub struct AuditHandlerState {
    pub audit_service: Arc<AuditService>,
}

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

fn domain_err(e: crate::domain::DomainError) -> HandlerError {
    (domain_error_status(&e), Json(ApiResponse::error(e.to_string())))
}

#[utoipa::path(
    get,
    path = "/api/v1/audit",
    tag = "Audit",
    security(("bearer_auth" = [])),
    params(AuditListParams),
    responses(
        (status = 200, description = "Latest audit entries, newest first", body = ApiResponse<Vec<AuditLogDto>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_audit_log(
    State(state): State<AuditHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<AuditListParams>,
) -> Result<Json<ApiResponse<Vec<AuditLogDto>>>, HandlerError> {
    if !user.is_admin() {
        return Err(forbidden("Admin role required"));
    }

    let records = state
        .audit_service
        .list_recent(params.limit)
        .await
        .map_err(domain_err)?;

    let entries: Vec<AuditLogDto> = records.into_iter().map(AuditLogDto::from).collect();
    Ok(Json(ApiResponse::success(entries)))
}

#[utoipa::path(
    get,
    path = "/api/v1/audit/export",
    tag = "Audit",
    security(("bearer_auth" = [])),
    params(AuditListParams),
    responses(
        (status = 200, description = "CSV export of the latest audit entries"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn export_audit_log(
    State(state): State<AuditHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<AuditListParams>,
) -> Result<Response, HandlerError> {
    if !user.is_admin() {
        return Err(forbidden("Admin role required"));
    }

    let body = state
        .audit_service
        .export_csv(params.limit)
        .await
        .map_err(domain_err)?;

    let filename = format!("audit_log_{}.csv", Utc::now().format("%Y%m%d"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}
