//! Types used by the intake service

use bytes::Bytes;
use docintake_core::models::{Document, DocumentType, Locale};
use docintake_core::Classification;
use uuid::Uuid;

/// A validated upload, ready for the pipeline.
///
/// Produced from the multipart form once every field check has passed, so the
/// service itself never sees malformed input.
#[derive(Debug, Clone)]
pub struct IntakeSubmission {
    pub company_id: Uuid,
    pub original_filename: String,
    pub content_type: String,
    pub data: Bytes,
    pub fiscal_year: i32,
    pub fiscal_period: String,
    /// Raw `documentType` form value, if any
    pub manual_type: Option<String>,
    pub locale: Locale,
}

/// Result of a successful intake
#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    pub document: Document,
    pub classification: Classification,
    /// Whether the analysis request was delivered
    pub analysis_dispatched: bool,
}

impl IntakeOutcome {
    pub fn detected_type(&self) -> DocumentType {
        self.classification.document_type
    }

    pub fn storage_path(&self) -> &str {
        &self.document.storage_path
    }
}
