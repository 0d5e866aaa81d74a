//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AssessmentService, AuditService, UserService};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};

use super::modules::{assessments, audit, auth, health, users};
use assessments::AssessmentHandlerState;
use audit::AuditHandlerState;
use auth::AuthHandlerState;
use users::UserHandlerState;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Auth
        auth::handlers::login,
        auth::handlers::logout,
        auth::handlers::get_current_user,
        auth::handlers::change_password,
        // Users
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::create_user,
        users::handlers::update_user,
        users::handlers::delete_user,
        users::handlers::reset_password,
        // Assessments
        assessments::handlers::get_options,
        assessments::handlers::submit_assessment,
        assessments::handlers::list_assessments,
        assessments::handlers::get_assessment,
        assessments::handlers::export_assessments,
        // Audit
        audit::handlers::list_audit_log,
        audit::handlers::export_audit_log,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<users::dto::UserDto>,
            PaginatedResponse<assessments::dto::AssessmentDto>,
            // Health
            health::handlers::HealthResponse,
            // Auth
            auth::dto::LoginRequest,
            auth::dto::LoginResponse,
            auth::dto::UserInfo,
            auth::dto::ChangePasswordRequest,
            // Users
            users::dto::UserDto,
            users::dto::CreateUserRequest,
            users::dto::UpdateUserRequest,
            users::dto::ResetPasswordRequest,
            // Assessments
            assessments::dto::SubmitAssessmentRequest,
            assessments::dto::AssessmentDto,
            assessments::dto::AssessmentResultDto,
            assessments::dto::ScoreBreakdownDto,
            assessments::dto::ScoreOptionDto,
            assessments::dto::AssessmentOptionsResponse,
            // Audit
            audit::dto::AuditLogDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User authentication: login (JWT), password change"),
        (name = "Users", description = "User account management (admin only)"),
        (name = "Assessments", description = "Credit assessments: factor tables, scoring, history and export"),
        (name = "Audit", description = "Append-only audit trail of operator actions (admin only)"),
    ),
    info(
        title = "Velocity Credit Assessment API",
        version = "1.0.0",
        description = "REST API for loan applicant credit scoring and risk assessment",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    user_service: Arc<UserService>,
    assessment_service: Arc<AssessmentService>,
    audit_service: Arc<AuditService>,
    jwt_config: JwtConfig,
) -> Router {
    let middleware_state = AuthState { jwt_config };

    let auth_state = AuthHandlerState {
        user_service: Arc::clone(&user_service),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::handlers::login))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/logout", post(auth::handlers::logout))
        .route("/me", get(auth::handlers::get_current_user))
        .route("/change-password", post(auth::handlers::change_password))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // User management routes (protected, admin checks inside handlers)
    let user_routes = Router::new()
        .route(
            "/",
            get(users::handlers::list_users).post(users::handlers::create_user),
        )
        .route(
            "/{id}",
            get(users::handlers::get_user)
                .put(users::handlers::update_user)
                .delete(users::handlers::delete_user),
        )
        .route("/{id}/reset-password", post(users::handlers::reset_password))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(UserHandlerState { user_service });

    // Assessment routes (protected)
    let assessment_routes = Router::new()
        .route(
            "/",
            get(assessments::handlers::list_assessments)
                .post(assessments::handlers::submit_assessment),
        )
        .route("/options", get(assessments::handlers::get_options))
        .route("/export", get(assessments::handlers::export_assessments))
        .route("/{id}", get(assessments::handlers::get_assessment))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(AssessmentHandlerState { assessment_service });

    // Audit routes (protected, admin checks inside handlers)
    let audit_routes = Router::new()
        .route("/", get(audit::handlers::list_audit_log))
        .route("/export", get(audit::handlers::export_audit_log))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(AuditHandlerState { audit_service });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::handlers::health_check))
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Users
        .nest("/api/v1/users", user_routes)
        // Assessments
        .nest("/api/v1/assessments", assessment_routes)
        // Audit
        .nest("/api/v1/audit", audit_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;
    use tower::util::ServiceExt;

    use crate::config::SecurityConfig;
    use crate::domain::RepositoryProvider;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));

        let jwt_config = JwtConfig::default();
        let user_service = Arc::new(UserService::new(
            Arc::clone(&repos),
            jwt_config.clone(),
            SecurityConfig::default(),
            "admin",
        ));
        user_service
            .bootstrap_admin("admin", "admin123", "Administrator")
            .await
            .unwrap();

        let assessment_service = Arc::new(AssessmentService::new(Arc::clone(&repos)));
        let audit_service = Arc::new(AuditService::new(repos));

        create_api_router(user_service, assessment_service, audit_service, jwt_config)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login_token(router: &Router) -> String {
        let response = router
            .clone()
            .oneshot(
                Request::post("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"admin","password":"admin123"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let router = test_router().await;
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let router = test_router().await;
        let response = router
            .oneshot(
                Request::get("/api/v1/assessments")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_then_submit_assessment() {
        let router = test_router().await;
        let token = login_token(&router).await;

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/v1/assessments")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{
                            "customer_name": "Acme Traders",
                            "is_new_customer": true,
                            "credit_history": 9,
                            "income_stability": 9,
                            "location": 9,
                            "banking_access": 9,
                            "referral": 9
                        }"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["data"]["assessment"]["risk_category"], "Low Risk");

        // The new assessment shows up in the list.
        let response = router
            .oneshot(
                Request::get("/api/v1/assessments")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected() {
        let router = test_router().await;
        let token = login_token(&router).await;

        let response = router
            .oneshot(
                Request::post("/api/v1/assessments")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{
                            "customer_name": "Acme",
                            "is_new_customer": false,
                            "credit_history": 0,
                            "income_stability": 5,
                            "location": 5,
                            "banking_access": 5,
                            "referral": 5
                        }"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn credit_history_table_depends_on_customer_type() {
        let router = test_router().await;
        let token = login_token(&router).await;

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/v1/assessments/options?new_customer=true")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let new_body = body_json(response).await;

        let response = router
            .oneshot(
                Request::get("/api/v1/assessments/options?new_customer=false")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let existing_body = body_json(response).await;

        assert_ne!(
            new_body["data"]["credit_history"],
            existing_body["data"]["credit_history"]
        );
        assert_eq!(
            new_body["data"]["referral"],
            existing_body["data"]["referral"]
        );
    }

    #[tokio::test]
    async fn change_password_is_a_post() {
        let router = test_router().await;
        let token = login_token(&router).await;

        let response = router
            .oneshot(
                Request::post("/api/v1/auth/change-password")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"current_password":"admin123","new_password":"freshpass1"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn audit_log_is_admin_only_and_records_logins() {
        let router = test_router().await;
        let token = login_token(&router).await;

        let response = router
            .oneshot(
                Request::get("/api/v1/audit")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let entries = body["data"].as_array().unwrap();
        assert!(entries.iter().any(|e| e["action"] == "login"));
    }
}
