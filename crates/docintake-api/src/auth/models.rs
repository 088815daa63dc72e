use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// User role for authorization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Member,
    Viewer,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Member => write!(f, "member"),
            UserRole::Viewer => write!(f, "viewer"),
        }
    }
}

/// JWT claims issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid, // user_id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: String, // "admin", "member", or "viewer"
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Authenticated caller, stored in request extensions by the auth middleware
#[derive(Debug, Clone)]
pub struct IdentityContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: UserRole,
}

impl IdentityContext {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

// Extension cannot be combined with Multipart, so read the context straight
// from the request parts.
impl<S> FromRequestParts<S> for IdentityContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityContext>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "Missing identity context".to_string(),
                        details: None,
                        error_type: None,
                        code: "MISSING_IDENTITY".to_string(),
                        recoverable: false,
                        suggested_action: Some("Check the bearer token".to_string()),
                    }),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display_matches_claim_values() {
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::Member.to_string(), "member");
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Viewer.is_admin());
    }

    #[test]
    fn test_claims_tolerate_missing_profile_fields() {
        let claims: JwtClaims = serde_json::from_value(serde_json::json!({
            "sub": "6f1c2a4e-8d3b-4b7a-9c1e-2f3a4b5c6d7e",
            "role": "member",
            "exp": 2_000_000_000_i64,
            "iat": 1_700_000_000_i64
        }))
        .unwrap();
        assert!(claims.email.is_none());
        assert!(claims.nbf.is_none());
    }
}
