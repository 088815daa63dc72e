//! Docintake Storage Library
//!
//! Object storage for uploaded company documents: the [`Storage`] trait with
//! S3 and local filesystem implementations.
//!
//! # Storage key format
//!
//! Every document lives under its company's prefix:
//!
//! - `documents/{company_id}/{uuid}.{ext}`
//!
//! `ext` is the lowercased extension of the original filename (omitted when the
//! name has none). Keys must not contain `..` or a leading `/`. Key generation is
//! centralized in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use docintake_core::StorageBackend;
pub use factory::create_storage;
pub use keys::{document_key, file_extension};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
