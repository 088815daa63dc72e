//! Shared key generation for storage backends.
//!
//! Key format: `documents/{company_id}/{uuid}.{ext}`.

use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

pub const DOCUMENTS_PREFIX: &str = "documents";
const MAX_EXTENSION_LEN: usize = 10;

/// Lowercased extension of an uploaded filename, if it has a usable one.
///
/// Directory components sent by some browsers are ignored. Dotfiles such as
/// `.env` and extensions with non-alphanumeric characters yield `None`.
pub fn file_extension(filename: &str) -> Option<String> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Prefix shared by all objects of one company.
pub fn company_prefix(company_id: Uuid) -> String {
    format!("{}/{}/", DOCUMENTS_PREFIX, company_id)
}

/// Generate a fresh storage key for a document of `company_id`.
///
/// The object name is a random v4 UUID that keeps the original extension, so
/// two uploads of the same filename never collide.
pub fn document_key(company_id: Uuid, original_filename: &str) -> String {
    let id = Uuid::new_v4();
    match file_extension(original_filename) {
        Some(ext) => format!("{}{}.{}", company_prefix(company_id), id, ext),
        None => format!("{}{}", company_prefix(company_id), id),
    }
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty()
        || storage_key.contains("..")
        || storage_key.starts_with('/')
        || storage_key.contains('\\')
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
