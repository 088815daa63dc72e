//! Multipart form handling for document uploads

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use docintake_core::models::fiscal::{resolve_fiscal_period, resolve_fiscal_year};
use docintake_core::models::Locale;
use docintake_core::AppError;
use docintake_storage::file_extension;
use uuid::Uuid;

use crate::services::IntakeSubmission;

const MAX_FILENAME_LENGTH: usize = 255;

/// File part of the upload form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Raw upload form. Unknown fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    pub company_id: Option<String>,
    pub file: Option<UploadedFile>,
    pub fiscal_year: Option<String>,
    pub fiscal_period: Option<String>,
    pub document_type: Option<String>,
    pub locale: Option<String>,
}

/// Size and type limits applied before anything is stored.
#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
}

fn multipart_error(e: MultipartError, what: &str) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the maximum upload size".to_string())
    } else {
        AppError::InvalidInput(format!("Failed to read {}: {}", what, e.body_text()))
    }
}

/// Read every field of the upload form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
pub async fn read_intake_form(mut multipart: Multipart) -> Result<IntakeForm, AppError> {
    let mut form = IntakeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "multipart"))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if form.file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let filename = field.file_name().map(|s| s.to_string()).unwrap_or_default();
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, "file data"))?;
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            }
            "companyId" | "fiscalYear" | "fiscalPeriod" | "documentType" | "locale" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, &field_name))?;
                let slot = match field_name.as_str() {
                    "companyId" => &mut form.company_id,
                    "fiscalYear" => &mut form.fiscal_year,
                    "fiscalPeriod" => &mut form.fiscal_period,
                    "documentType" => &mut form.document_type,
                    _ => &mut form.locale,
                };
                *slot = Some(value);
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

impl IntakeForm {
    /// Validate the form into a pipeline submission.
    ///
    /// Every 400 check runs before the size check (413), and neither touches
    /// a store.
    pub fn into_submission(
        self,
        limits: &UploadLimits,
        current_year: i32,
    ) -> Result<IntakeSubmission, AppError> {
        let company_id = self
            .company_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::InvalidInput("companyId is required".to_string()))?;

        let file = self
            .file
            .ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

        let company_id = Uuid::parse_str(company_id).map_err(|_| {
            AppError::InvalidInput(format!("companyId '{}' is not a valid UUID", company_id))
        })?;

        let fiscal_year = resolve_fiscal_year(self.fiscal_year.as_deref(), current_year)?;
        let fiscal_period = resolve_fiscal_period(self.fiscal_period.as_deref())?;

        let original_filename = clean_filename(&file.filename)?;
        validate_file_extension(&original_filename, &limits.allowed_extensions)?;

        if file.data.is_empty() {
            return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
        }
        validate_file_size(file.data.len(), limits.max_file_size)?;

        Ok(IntakeSubmission {
            company_id,
            original_filename,
            content_type: normalize_mime_type(&file.content_type).to_lowercase(),
            data: file.data,
            fiscal_year,
            fiscal_period,
            manual_type: self.document_type,
            locale: Locale::parse_or_default(self.locale.as_deref()),
        })
    }
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Validate file extension against the allowlist
pub fn validate_file_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    let extension = file_extension(filename).unwrap_or_default();

    if extension.is_empty() || !allowed_extensions.iter().any(|e| e == &extension) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file extension. Allowed extensions: {}",
            allowed_extensions.join(", ")
        )));
    }

    Ok(extension)
}

/// Keep the display name the user chose, minus any directory part and
/// control characters.
pub fn clean_filename(filename: &str) -> Result<String, AppError> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_FILENAME_LENGTH)
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return Err(AppError::InvalidInput(
            "File must have a name".to_string(),
        ));
    }

    Ok(cleaned.to_string())
}

/// Normalize MIME type by stripping parameters (e.g. "text/csv; charset=utf-8" -> "text/csv").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}
