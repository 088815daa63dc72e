//! Company ownership guard
//!
//! Every company-scoped handler goes through these two functions.

use crate::auth::models::IdentityContext;
use docintake_core::models::Company;
use docintake_core::AppError;
use docintake_db::CompanyStore;
use uuid::Uuid;

/// Allow the owner of a resource, or an administrator.
pub fn authorize(identity: &IdentityContext, owner_id: Uuid) -> Result<(), AppError> {
    if identity.is_admin() || identity.user_id == owner_id {
        return Ok(());
    }

    tracing::warn!(
        user_id = %identity.user_id,
        owner_id = %owner_id,
        "Ownership check failed"
    );
    Err(AppError::Forbidden(
        "You do not have access to this company".to_string(),
    ))
}

/// Load the company and check the caller may act on it.
///
/// An unknown company is reported as 404 to administrators only. Everyone
/// else gets the same 403 as for a foreign company, so company ids cannot be
/// enumerated.
pub async fn ensure_company_access(
    identity: &IdentityContext,
    companies: &dyn CompanyStore,
    company_id: Uuid,
) -> Result<Company, AppError> {
    let company = match companies.get(company_id).await? {
        Some(company) => company,
        None if identity.is_admin() => {
            return Err(AppError::NotFound(format!(
                "Company {} not found",
                company_id
            )))
        }
        None => {
            tracing::warn!(
                user_id = %identity.user_id,
                company_id = %company_id,
                "Access to unknown company denied"
            );
            return Err(AppError::Forbidden(
                "You do not have access to this company".to_string(),
            ));
        }
    };

    authorize(identity, company.owner_id())?;
    Ok(company)
}
