use chrono::Utc;
use docintake_api::auth::{JwtClaims, JwtService};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-at-least-32-characters";

pub fn token_for(user_id: Uuid, role: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id,
        email: Some("aino.virtanen@example.fi".to_string()),
        name: Some("Aino Virtanen".to_string()),
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
        nbf: None,
        iss: None,
    };
    JwtService::new(TEST_JWT_SECRET, None)
        .encode(&claims)
        .expect("Failed to sign test token")
}

pub fn expired_token_for(user_id: Uuid) -> String {
    let now = Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id,
        email: None,
        name: None,
        role: "member".to_string(),
        exp: now - 600,
        iat: now - 4200,
        nbf: None,
        iss: None,
    };
    JwtService::new(TEST_JWT_SECRET, None)
        .encode(&claims)
        .expect("Failed to sign test token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
