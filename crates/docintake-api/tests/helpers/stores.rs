//! In-memory collaborators for the intake pipeline.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use docintake_api::services::{
    AnalysisDispatcher, DispatchError, NotificationError, Notifier, UploadNotification,
};
use docintake_core::models::{
    AnalysisRequest, Company, DispatchFailure, Document, DocumentType, DocumentTypeEntry,
    NewDocument, ProcessingStatus,
};
use docintake_core::AppError;
use docintake_db::{CompanyStore, DispatchFailureStore, DocumentStore, DocumentTypeCatalog};
use docintake_storage::{LocalStorage, Storage, StorageBackend, StorageError, StorageResult};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::fixtures::{COMPANY_ID, OWNER_ID};

pub struct InMemoryDocuments {
    rows: Mutex<Vec<Document>>,
    fail_create: bool,
}

impl InMemoryDocuments {
    pub fn new(fail_create: bool) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_create,
        }
    }

    pub fn all(&self) -> Vec<Document> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocuments {
    async fn create(&self, new: NewDocument) -> Result<Document, AppError> {
        if self.fail_create {
            return Err(AppError::Internal("connection reset by peer".to_string()));
        }
        let now = Utc::now();
        let document = Document {
            id: new.id,
            company_id: new.company_id,
            document_type: new.document_type,
            document_type_id: None,
            original_filename: new.original_filename,
            storage_path: new.storage_path,
            mime_type: new.mime_type,
            file_size: new.file_size,
            fiscal_year: new.fiscal_year,
            fiscal_period: new.fiscal_period,
            uploaded_by: new.uploaded_by,
            status: ProcessingStatus::Pending,
            metadata: new.metadata,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(document.clone());
        Ok(document)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn list_for_company(
        &self,
        company_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>, AppError> {
        let mut rows: Vec<Document> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.company_id == company_id)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct InMemoryCompanies {
    companies: HashMap<Uuid, Company>,
}

impl InMemoryCompanies {
    pub fn with_fixtures() -> Self {
        let now = Utc::now();
        let company = Company {
            id: COMPANY_ID,
            name: "Konepaja Virtanen Oy".to_string(),
            business_id: Some("1234567-8".to_string()),
            created_by: OWNER_ID,
            created_at: now,
            updated_at: now,
        };
        Self {
            companies: HashMap::from([(company.id, company)]),
        }
    }
}

#[async_trait]
impl CompanyStore for InMemoryCompanies {
    async fn get(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        Ok(self.companies.get(&id).cloned())
    }
}

pub struct InMemoryCatalog;

#[async_trait]
impl DocumentTypeCatalog for InMemoryCatalog {
    async fn list(&self) -> Result<Vec<DocumentTypeEntry>, AppError> {
        Ok(DocumentType::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| DocumentTypeEntry {
                id: Uuid::new_v4(),
                code: t.code().to_string(),
                name_fi: format!("fi:{}", t.code()),
                name_sv: format!("sv:{}", t.code()),
                name_en: format!("en:{}", t.code()),
                sort_order: (i as i32 + 1) * 10,
            })
            .collect())
    }
}

/// `LocalStorage` that counts writes and remembers deleted keys.
/// With `fail_upload` every write is refused.
pub struct RecordingStorage {
    inner: LocalStorage,
    uploads: AtomicUsize,
    deleted: Mutex<Vec<String>>,
    fail_upload: bool,
}

impl RecordingStorage {
    pub fn new(inner: LocalStorage, fail_upload: bool) -> Self {
        Self {
            inner,
            uploads: AtomicUsize::new(0),
            deleted: Mutex::new(Vec::new()),
            fail_upload,
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload {
            return Err(StorageError::UploadFailed(format!(
                "bucket unavailable for {}",
                storage_key
            )));
        }
        self.inner
            .upload_with_key(storage_key, data, content_type)
            .await
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Bytes> {
        self.inner.download(storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.deleted.lock().unwrap().push(storage_key.to_string());
        self.inner.delete(storage_key).await
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.inner.exists(storage_key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}

pub struct MockDispatcher {
    requests: Mutex<Vec<AnalysisRequest>>,
    fail: bool,
}

impl MockDispatcher {
    pub fn new(fail: bool) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail,
        }
    }

    pub fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisDispatcher for MockDispatcher {
    async fn dispatch(&self, request: &AnalysisRequest) -> Result<(), DispatchError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(DispatchError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

#[derive(Default)]
pub struct InMemoryFailures {
    entries: Mutex<Vec<DispatchFailure>>,
}

impl InMemoryFailures {
    pub fn all(&self) -> Vec<DispatchFailure> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DispatchFailureStore for InMemoryFailures {
    async fn record(
        &self,
        document_id: Uuid,
        company_id: Uuid,
        backend: &str,
        error: &str,
        payload: JsonValue,
    ) -> Result<DispatchFailure, AppError> {
        let entry = DispatchFailure {
            id: Uuid::new_v4(),
            document_id,
            company_id,
            backend: backend.to_string(),
            error: error.to_string(),
            payload,
            created_at: Utc::now(),
        };
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }
}

pub struct QuietNotifier;

#[async_trait]
impl Notifier for QuietNotifier {
    async fn notify(&self, _notification: UploadNotification) -> Result<(), NotificationError> {
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _notification: UploadNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("SMTP server unavailable".to_string()))
    }
}
