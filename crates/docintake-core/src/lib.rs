//! Docintake Core Library
//!
//! Domain models, the filename classifier, error types and configuration
//! shared by the storage, database and API crates.

pub mod classification;
pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use classification::{Classification, Classifier, OverrideMode, OverridePolicy};
pub use config::{BaseConfig, Config, DispatchBackend, IntakeConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
