use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DbState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use docintake_core::models::{DocumentTypeEntry, Locale};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct CatalogQuery {
    /// `fi`, `sv` or `en`; defaults to `fi`
    pub locale: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentTypeResponse {
    pub code: String,
    /// Name in the requested locale
    pub name: String,
    pub name_fi: String,
    pub name_sv: String,
    pub name_en: String,
    pub sort_order: i32,
}

impl DocumentTypeResponse {
    fn localized(entry: DocumentTypeEntry, locale: Locale) -> Self {
        Self {
            name: entry.localized_name(locale).to_string(),
            code: entry.code,
            name_fi: entry.name_fi,
            name_sv: entry.name_sv,
            name_en: entry.name_en,
            sort_order: entry.sort_order,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/document-types",
    tag = "document-types",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Document type catalog", body = Vec<DocumentTypeResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_document_types(
    State(db): State<DbState>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let locale = Locale::parse_or_default(query.locale.as_deref());
    let entries = db.document_types.list().await?;

    let response: Vec<DocumentTypeResponse> = entries
        .into_iter()
        .map(|entry| DocumentTypeResponse::localized(entry, locale))
        .collect();
    Ok(Json(response))
}
