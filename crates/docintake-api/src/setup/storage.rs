//! Storage setup and initialization

use anyhow::{Context, Result};
use docintake_core::Config;
use docintake_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing document storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %config.s3_bucket(),
        "Document storage initialized"
    );
    Ok(storage)
}
