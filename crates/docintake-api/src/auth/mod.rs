//! Bearer-token authentication and company-level authorization.

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use authorization::{authorize, ensure_company_access};
pub use jwt::JwtService;
pub use models::{IdentityContext, JwtClaims, UserRole};
