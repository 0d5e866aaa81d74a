//! Assessment API handlers
//!
//! The wizard flow maps to three calls: fetch the factor tables, submit the
//! selections, read back the stored result. List and export are available to
//! every authenticated user; submitting requires an assessor role.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use super::dto::{
    AssessmentDto, AssessmentOptionsResponse, AssessmentResultDto, ExportParams,
    ListAssessmentsParams, OptionsParams, SubmitAssessmentRequest,
};
use crate::application::assessments::ExportFormat;
use crate::application::AssessmentService;
use crate::domain::{AssessmentFilter, ComponentScores};
use crate::interfaces::http::common::{
    domain_error_status, ApiResponse, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::{forbidden, AuthenticatedUser};

#[derive(Clone)]
pub struct AssessmentHandlerState {
    pub assessment_service: Arc<AssessmentService>,
}

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

fn domain_err(e: crate::domain::DomainError) -> HandlerError {
    (domain_error_status(&e), Json(ApiResponse::error(e.to_string())))
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last representable instant of the day, so `end_date` bounds inclusively.
fn day_end(date: NaiveDate) -> DateTime<Utc> {
    day_start(date) + Duration::days(1) - Duration::milliseconds(1)
}

fn date_filter(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AssessmentFilter {
    AssessmentFilter {
        from: start.map(day_start),
        to: end.map(day_end),
        ..Default::default()
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/assessments/options",
    tag = "Assessments",
    security(("bearer_auth" = [])),
    params(OptionsParams),
    responses(
        (status = 200, description = "Factor lookup tables", body = ApiResponse<AssessmentOptionsResponse>)
    )
)]
pub async fn get_options(
    Query(params): Query<OptionsParams>,
) -> Json<ApiResponse<AssessmentOptionsResponse>> {
    Json(ApiResponse::success(AssessmentOptionsResponse::for_customer(
        params.new_customer,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/assessments",
    tag = "Assessments",
    security(("bearer_auth" = [])),
    request_body = SubmitAssessmentRequest,
    responses(
        (status = 201, description = "Assessment scored and saved", body = ApiResponse<AssessmentResultDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Viewer role cannot submit assessments")
    )
)]
pub async fn submit_assessment(
    State(state): State<AssessmentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<SubmitAssessmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AssessmentResultDto>>), HandlerError> {
    if !user.can_assess() {
        return Err(forbidden("Viewer role cannot submit assessments"));
    }

    let result = state
        .assessment_service
        .submit(
            &user.user_id,
            &request.customer_name,
            request.is_new_customer,
            ComponentScores {
                credit_history: request.credit_history,
                income_stability: request.income_stability,
                location: request.location,
                banking_access: request.banking_access,
                referral: request.referral,
            },
        )
        .await
        .map_err(domain_err)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AssessmentResultDto {
            assessment: AssessmentDto::from(result.assessment),
            breakdown: result.breakdown.into(),
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/assessments",
    tag = "Assessments",
    security(("bearer_auth" = [])),
    params(ListAssessmentsParams),
    responses(
        (status = 200, description = "Assessment page, newest first", body = PaginatedResponse<AssessmentDto>)
    )
)]
pub async fn list_assessments(
    State(state): State<AssessmentHandlerState>,
    Query(params): Query<ListAssessmentsParams>,
) -> Result<Json<PaginatedResponse<AssessmentDto>>, HandlerError> {
    let mut filter = date_filter(params.start_date, params.end_date);
    filter.page = Some(params.page);
    filter.page_size = Some(params.page_size);

    let result = state
        .assessment_service
        .list(filter)
        .await
        .map_err(domain_err)?;

    let items: Vec<AssessmentDto> = result.items.into_iter().map(AssessmentDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        items,
        result.total,
        result.page,
        result.limit,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/assessments/{id}",
    tag = "Assessments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Assessment details", body = ApiResponse<AssessmentDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_assessment(
    State(state): State<AssessmentHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AssessmentDto>>, HandlerError> {
    match state
        .assessment_service
        .get_by_id(id)
        .await
        .map_err(domain_err)?
    {
        Some(found) => Ok(Json(ApiResponse::success(AssessmentDto::from(found)))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Assessment {} not found", id))),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/assessments/export",
    tag = "Assessments",
    security(("bearer_auth" = [])),
    params(ExportParams),
    responses(
        (status = 200, description = "Tabular export of the selected date range"),
        (status = 400, description = "Unknown export format"),
        (status = 404, description = "No assessments in the selected range")
    )
)]
pub async fn export_assessments(
    State(state): State<AssessmentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ExportParams>,
) -> Result<Response, HandlerError> {
    let format = match params.format.as_deref() {
        None => ExportFormat::Csv,
        Some(raw) => ExportFormat::parse(raw).ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!("Unknown export format: {}", raw))),
            )
        })?,
    };

    let filter = date_filter(params.start_date, params.end_date);
    let output = state
        .assessment_service
        .export(&user.user_id, filter, format)
        .await
        .map_err(domain_err)?;

    let filename = format!(
        "credit_assessments_{}_{}.{}",
        params
            .start_date
            .map_or_else(|| "all".to_string(), |d| d.format("%Y%m%d").to_string()),
        params
            .end_date
            .map_or_else(|| "all".to_string(), |d| d.format("%Y%m%d").to_string()),
        format.as_str(),
    );

    Ok((
        [
            (header::CONTENT_TYPE, output.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        output.body,
    )
        .into_response())
}
