use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::{DocumentType, Locale};

/// Manual selection facts forwarded to the analysis worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideInfo {
    pub detected_type: DocumentType,
    pub is_manual_selection: bool,
    pub original_manual_selection: Option<String>,
}

/// Payload of an analysis request emitted after a successful intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub document_id: Uuid,
    pub company_id: Uuid,
    pub locale: Locale,
    pub override_info: OverrideInfo,
}

impl AnalysisRequest {
    pub fn to_json_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

/// Ledger entry for a dispatch that could not be delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DispatchFailure {
    pub id: Uuid,
    pub document_id: Uuid,
    pub company_id: Uuid,
    pub backend: String,
    pub error: String,
    pub payload: JsonValue,
    pub created_at: DateTime<Utc>,
}
