use crate::auth::IdentityContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::IntakeOutcome;
use crate::state::IntakeState;
use crate::utils::upload::read_intake_form;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Utc};
use docintake_core::models::{DocumentResponse, DocumentType, Locale};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentResponse {
    pub success: bool,
    pub document: DocumentResponse,
    pub file_path: String,
    pub detected_type: DocumentType,
    pub message: String,
}

fn success_message(locale: Locale) -> &'static str {
    match locale {
        Locale::Fi => "Asiakirja ladattu onnistuneesti. Analyysi on käynnistetty.",
        Locale::Sv => "Dokumentet har laddats upp. Analysen har startats.",
        Locale::En => "Document uploaded successfully. Analysis has been started.",
    }
}

impl UploadDocumentResponse {
    fn from_outcome(outcome: IntakeOutcome) -> Self {
        let locale = outcome.document.metadata.locale;
        let file_path = outcome.storage_path().to_string();
        let detected_type = outcome.detected_type();
        Self {
            success: true,
            document: DocumentResponse::from(outcome.document),
            file_path,
            detected_type,
            message: success_message(locale).to_string(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Fields: file, companyId, fiscalYear, fiscalPeriod, documentType, locale"),
    responses(
        (status = 201, description = "Document uploaded and recorded", body = UploadDocumentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the company", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_document(
    State(intake): State<IntakeState>,
    identity: IdentityContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let multipart = multipart.map_err(HttpAppError::from)?;
    let form = read_intake_form(multipart).await?;
    let submission = form.into_submission(&intake.limits, Utc::now().year())?;

    let outcome = intake.service.intake(&identity, submission).await?;

    tracing::info!(
        document_id = %outcome.document.id,
        company_id = %outcome.document.company_id,
        user_id = %identity.user_id,
        analysis_dispatched = outcome.analysis_dispatched,
        "Document intake completed"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadDocumentResponse::from_outcome(outcome)),
    ))
}
