//! Service initialization and application state setup

use crate::services::dispatch::create_dispatcher;
use crate::services::intake::{DocumentIntakeService, IntakeDependencies};
use crate::services::notification::create_notifier;
use crate::state::{AppState, DbState, IntakeState};
use crate::utils::upload::UploadLimits;
use anyhow::{Context, Result};
use docintake_core::{Classifier, Config};
use docintake_db::{
    AnalysisTaskRepository, CompanyRepository, DispatchFailureRepository, DocumentRepository,
    DocumentTypeRepository,
};
use docintake_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Initialize repositories and services, returning the application state
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let documents = Arc::new(DocumentRepository::new(pool.clone()));
    let companies = Arc::new(CompanyRepository::new(pool.clone()));
    let document_types = Arc::new(DocumentTypeRepository::new(pool.clone()));
    let analysis_tasks = Arc::new(AnalysisTaskRepository::new(pool.clone()));
    let dispatch_failures = Arc::new(DispatchFailureRepository::new(pool));

    let dispatcher =
        create_dispatcher(config, analysis_tasks).context("Failed to create analysis dispatcher")?;
    let notifier = create_notifier(config);

    let policy = config.override_policy().clone();
    tracing::info!(
        authoritative = ?policy.authoritative_types(),
        "Manual document type override policy loaded"
    );

    let intake = DocumentIntakeService::new(
        IntakeDependencies {
            storage: storage.clone(),
            documents: documents.clone(),
            companies: companies.clone(),
            dispatcher,
            dispatch_failures,
            notifier,
        },
        Classifier::new(policy),
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        db: DbState {
            documents,
            companies,
            document_types,
        },
        intake: IntakeState {
            service: Arc::new(intake),
            limits: UploadLimits {
                max_file_size: config.max_document_size_bytes(),
                allowed_extensions: config.document_allowed_extensions().to_vec(),
            },
        },
        storage,
    }))
}
