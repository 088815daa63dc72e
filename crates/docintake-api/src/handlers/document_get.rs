use crate::auth::{ensure_company_access, IdentityContext};
use crate::error::{ApiPath, ErrorResponse, HttpAppError, ValidatedQuery};
use crate::state::DbState;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use docintake_core::models::DocumentResponse;
use docintake_core::AppError;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

const DEFAULT_LIMIT: i64 = 50;

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document found", body = DocumentResponse),
        (status = 400, description = "Malformed document id", body = ErrorResponse),
        (status = 403, description = "Caller does not own the company", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_document(
    State(db): State<DbState>,
    identity: IdentityContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let document = db
        .documents
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    ensure_company_access(&identity, db.companies.as_ref(), document.company_id).await?;

    Ok(Json(DocumentResponse::from(document)))
}

#[derive(Debug, Deserialize, Validate, ToSchema, IntoParams)]
pub struct PaginationQuery {
    /// Page size, 1-200 (default 50)
    #[validate(range(min = 1, max = 200))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/companies/{company_id}/documents",
    tag = "documents",
    params(
        ("company_id" = Uuid, Path, description = "Company ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Documents of the company, newest first", body = Vec<DocumentResponse>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
        (status = 403, description = "Caller does not own the company", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_company_documents(
    State(db): State<DbState>,
    identity: IdentityContext,
    ApiPath(company_id): ApiPath<Uuid>,
    ValidatedQuery(pagination): ValidatedQuery<PaginationQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    ensure_company_access(&identity, db.companies.as_ref(), company_id).await?;

    let documents = db
        .documents
        .list_for_company(
            company_id,
            pagination.limit.unwrap_or(DEFAULT_LIMIT),
            pagination.offset.unwrap_or(0),
        )
        .await?;

    let responses: Vec<DocumentResponse> =
        documents.into_iter().map(DocumentResponse::from).collect();
    Ok(Json(responses))
}
