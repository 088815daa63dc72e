//! Docintake Database Layer
//!
//! Postgres repositories for documents, companies, the document type catalog
//! and the analysis hand-off tables, plus the store traits the API depends on.

pub mod db;
pub mod store_traits;

// Re-exports: repositories
pub use db::{
    AnalysisTaskRepository, CompanyRepository, DispatchFailureRepository, DocumentRepository,
    DocumentTypeRepository,
};

// Re-exports: store traits
pub use store_traits::{
    AnalysisTaskStore, CompanyStore, DispatchFailureStore, DocumentStore, DocumentTypeCatalog,
};
