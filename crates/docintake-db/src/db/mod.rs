//! Database repositories for data access layer
//!
//! Each repository owns one table and is a thin wrapper around a `PgPool`.

pub mod analysis_task;
pub mod company;
pub mod dispatch_failure;
pub mod document;
pub mod document_type;

pub use analysis_task::AnalysisTaskRepository;
pub use company::CompanyRepository;
pub use dispatch_failure::DispatchFailureRepository;
pub use document::DocumentRepository;
pub use document_type::DocumentTypeRepository;
