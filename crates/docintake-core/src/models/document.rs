use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{DocumentType, Locale};

/// Document processing status.
///
/// Intake only ever creates `Pending`; the analysis worker moves documents
/// through `Processing` to `Done` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "document_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Done => write!(f, "done"),
            ProcessingStatus::Failed => write!(f, "failed"),
        }
    }
}

const CLASSIFICATION_KEYS: &[&str] = &[
    "detected_type",
    "is_manual_selection",
    "original_manual_selection",
    "locale",
    "matched_rule",
];

/// Classification facts stored in `documents.metadata`.
///
/// Keys written by other components (e.g. extraction results from the
/// analysis worker) are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub detected_type: DocumentType,
    pub is_manual_selection: bool,
    #[serde(default)]
    pub original_manual_selection: Option<String>,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<String>,
    #[serde(flatten, default)]
    pub extra: JsonMap<String, JsonValue>,
}

impl DocumentMetadata {
    /// Metadata for a row whose stored JSON could not be read back.
    pub fn detected(document_type: DocumentType) -> Self {
        Self {
            detected_type: document_type,
            is_manual_selection: false,
            original_manual_selection: None,
            locale: Locale::default(),
            matched_rule: None,
            extra: JsonMap::new(),
        }
    }

    /// Fallback for a stored object that failed to deserialize: classification
    /// facts are reset from the row, every other key is carried over.
    pub fn recovered(document_type: DocumentType, raw: JsonValue) -> Self {
        let mut metadata = Self::detected(document_type);
        if let JsonValue::Object(map) = raw {
            metadata.extra = map
                .into_iter()
                .filter(|(k, _)| !CLASSIFICATION_KEYS.contains(&k.as_str()))
                .collect();
        }
        metadata
    }

    pub fn to_json_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

/// Persisted document row as returned by Postgres.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DocumentRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub document_type: String,
    pub document_type_id: Option<Uuid>,
    pub original_filename: String,
    pub storage_path: String,
    pub mime_type: String,
    pub file_size: i64,
    pub fiscal_year: i32,
    pub fiscal_period: String,
    pub uploaded_by: Uuid,
    pub status: ProcessingStatus,
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One uploaded company document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub company_id: Uuid,
    pub document_type: DocumentType,
    pub document_type_id: Option<Uuid>,
    pub original_filename: String,
    pub storage_path: String,
    pub mime_type: String,
    pub file_size: i64,
    pub fiscal_year: i32,
    pub fiscal_period: String,
    pub uploaded_by: Uuid,
    pub status: ProcessingStatus,
    pub metadata: DocumentMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        let document_type = DocumentType::from_code(&row.document_type).unwrap_or(DocumentType::Other);
        let metadata = match serde_json::from_value::<DocumentMetadata>(row.metadata.clone()) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(
                    document_id = %row.id,
                    error = %e,
                    "Stored document metadata unreadable, keeping unknown keys only"
                );
                DocumentMetadata::recovered(document_type, row.metadata)
            }
        };
        Document {
            id: row.id,
            company_id: row.company_id,
            document_type,
            document_type_id: row.document_type_id,
            original_filename: row.original_filename,
            storage_path: row.storage_path,
            mime_type: row.mime_type,
            file_size: row.file_size,
            fiscal_year: row.fiscal_year,
            fiscal_period: row.fiscal_period,
            uploaded_by: row.uploaded_by,
            status: row.status,
            metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Values for inserting a new document row. Status is always `pending`.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub id: Uuid,
    pub company_id: Uuid,
    pub document_type: DocumentType,
    pub original_filename: String,
    pub storage_path: String,
    pub mime_type: String,
    pub file_size: i64,
    pub fiscal_year: i32,
    pub fiscal_period: String,
    pub uploaded_by: Uuid,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    pub document_type: DocumentType,
    pub name: String,
    pub storage_path: String,
    pub mime_type: String,
    pub file_size: i64,
    pub fiscal_year: i32,
    pub fiscal_period: String,
    pub uploaded_by: Uuid,
    pub status: ProcessingStatus,
    #[schema(value_type = Object)]
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        DocumentResponse {
            id: doc.id,
            company_id: doc.company_id,
            document_type: doc.document_type,
            name: doc.original_filename,
            storage_path: doc.storage_path,
            mime_type: doc.mime_type,
            file_size: doc.file_size,
            fiscal_year: doc.fiscal_year,
            fiscal_period: doc.fiscal_period,
            uploaded_by: doc.uploaded_by,
            status: doc.status,
            metadata: doc.metadata.to_json_value(),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}
