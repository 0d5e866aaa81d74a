//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::ApiResponse;

/// Authentication state carried by protected routes.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Authenticated user information extracted from the JWT.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Admin or regular user — may run assessments.
    pub fn can_assess(&self) -> bool {
        UserRole::from_str_opt(&self.role).is_some_and(|r| r.can_assess())
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}

/// Forbidden response used by handlers for role failures.
pub fn forbidden(message: &str) -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::FORBIDDEN, Json(ApiResponse::error(message)))
}

/// JWT authentication middleware. On success the request gains an
/// `AuthenticatedUser` extension.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);

    let Some(auth_header) = auth_header else {
        return unauthorized("Missing authorization header");
    };

    let Some(token) = extract_token(&auth_header) else {
        return unauthorized("Invalid authorization header");
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return unauthorized("Token expired");
            }
            let user = AuthenticatedUser::from_claims(claims);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(_) => unauthorized("Invalid token"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("Basic dXNlcg=="), None);
    }

    #[test]
    fn test_role_checks() {
        let admin = AuthenticatedUser {
            user_id: "1".into(),
            username: "a".into(),
            role: "admin".into(),
        };
        let viewer = AuthenticatedUser {
            user_id: "2".into(),
            username: "v".into(),
            role: "viewer".into(),
        };
        assert!(admin.is_admin() && admin.can_assess());
        assert!(!viewer.is_admin() && !viewer.can_assess());
    }
}
