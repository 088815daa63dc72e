//! OpenAPI documentation.
//! API version is in `crate::constants::API_VERSION`; handler annotations
//! carry the full `/api/v1` path.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use docintake_core::models;

/// Returns the OpenAPI spec with the bearer scheme the protected routes reference.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    let components = spec.components.get_or_insert_with(Default::default);
    components.add_security_scheme(
        "bearer_auth",
        SecurityScheme::Http(
            HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .build(),
        ),
    );
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Document Intake API",
        version = "0.1.0",
        description = "Upload, classification and retrieval of company financing documents. All endpoints are versioned under /api/v1/."
    ),
    paths(
        handlers::document_upload::upload_document,
        handlers::document_get::get_document,
        handlers::document_get::list_company_documents,
        handlers::document_types::list_document_types,
    ),
    components(
        schemas(
            models::DocumentResponse,
            models::DocumentType,
            models::ProcessingStatus,
            models::Locale,
            handlers::document_upload::UploadDocumentResponse,
            handlers::document_types::DocumentTypeResponse,
            handlers::document_get::PaginationQuery,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "documents", description = "Document upload, classification and retrieval"),
        (name = "document-types", description = "Localized document type catalog")
    )
)]
pub struct ApiDoc;
