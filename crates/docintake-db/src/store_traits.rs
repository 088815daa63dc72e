//! Store trait abstractions
//!
//! The API layer only talks to these traits, so handlers and the intake
//! pipeline can be exercised against in-memory implementations without a
//! database.

use async_trait::async_trait;
use docintake_core::models::{
    AnalysisRequest, Company, DispatchFailure, Document, DocumentTypeEntry, NewDocument,
};
use docintake_core::AppError;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::db::{
    AnalysisTaskRepository, CompanyRepository, DispatchFailureRepository, DocumentRepository,
    DocumentTypeRepository,
};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a pending document row
    async fn create(&self, new: NewDocument) -> Result<Document, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError>;

    /// Documents of a company, newest first
    async fn list_for_company(
        &self,
        company_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>, AppError>;

    /// Readiness check
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Company>, AppError>;
}

#[async_trait]
pub trait DocumentTypeCatalog: Send + Sync {
    async fn list(&self) -> Result<Vec<DocumentTypeEntry>, AppError>;
}

#[async_trait]
pub trait AnalysisTaskStore: Send + Sync {
    /// Queue an analysis task and return its id
    async fn enqueue(&self, request: &AnalysisRequest) -> Result<Uuid, AppError>;
}

#[async_trait]
pub trait DispatchFailureStore: Send + Sync {
    async fn record(
        &self,
        document_id: Uuid,
        company_id: Uuid,
        backend: &str,
        error: &str,
        payload: JsonValue,
    ) -> Result<DispatchFailure, AppError>;
}

// Implementations for concrete repository types

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn create(&self, new: NewDocument) -> Result<Document, AppError> {
        DocumentRepository::create(self, new).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        DocumentRepository::get(self, id).await
    }

    async fn list_for_company(
        &self,
        company_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>, AppError> {
        DocumentRepository::list_for_company(self, company_id, limit, offset).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        DocumentRepository::ping(self).await
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        CompanyRepository::get(self, id).await
    }
}

#[async_trait]
impl DocumentTypeCatalog for DocumentTypeRepository {
    async fn list(&self) -> Result<Vec<DocumentTypeEntry>, AppError> {
        DocumentTypeRepository::list(self).await
    }
}

#[async_trait]
impl AnalysisTaskStore for AnalysisTaskRepository {
    async fn enqueue(&self, request: &AnalysisRequest) -> Result<Uuid, AppError> {
        AnalysisTaskRepository::enqueue(self, request).await
    }
}

#[async_trait]
impl DispatchFailureStore for DispatchFailureRepository {
    async fn record(
        &self,
        document_id: Uuid,
        company_id: Uuid,
        backend: &str,
        error: &str,
        payload: JsonValue,
    ) -> Result<DispatchFailure, AppError> {
        DispatchFailureRepository::record(self, document_id, company_id, backend, error, payload)
            .await
    }
}
