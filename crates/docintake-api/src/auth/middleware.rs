use crate::auth::jwt::JwtService;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use docintake_core::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
}

impl AuthState {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        Self {
            jwt: JwtService::new(secret, issuer),
        }
    }
}

/// Resolve the bearer token to an [`IdentityContext`](crate::auth::IdentityContext)
/// and store it in the request extensions. Runs before any handler touches a store.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            tracing::debug!(path = %request.uri().path(), "Rejected request without credentials");
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => token.trim(),
        _ => {
            return HttpAppError(AppError::Unauthorized(
                "Invalid authorization header format".to_string(),
            ))
            .into_response();
        }
    };

    let identity = match auth_state.jwt.authenticate(token) {
        Ok(identity) => identity,
        Err(e) => return HttpAppError(e).into_response(),
    };

    tracing::debug!(
        user_id = %identity.user_id,
        role = %identity.role,
        "Request authenticated"
    );

    request.extensions_mut().insert(identity);
    next.run(request).await
}
