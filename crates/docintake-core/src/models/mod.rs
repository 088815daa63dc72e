//! Data models for the application
//!
//! Documents, their type catalog, companies and the analysis hand-off payloads.

mod analysis;
mod company;
mod document;
mod document_type;
pub mod fiscal;
mod locale;

pub use analysis::{AnalysisRequest, DispatchFailure, OverrideInfo};
pub use company::Company;
pub use document::{
    Document, DocumentMetadata, DocumentResponse, DocumentRow, NewDocument, ProcessingStatus,
};
pub use document_type::{DocumentType, DocumentTypeEntry};
pub use locale::Locale;
