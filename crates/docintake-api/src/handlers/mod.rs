pub mod document_get;
pub mod document_types;
pub mod document_upload;
