//! Application state and sub-state extractors.
//!
//! Stores and collaborators are held as trait objects so the router can be
//! driven against in-memory implementations in tests. Handlers extract only
//! the sub-state they need via Axum's `FromRef`.

use crate::services::DocumentIntakeService;
use crate::utils::upload::UploadLimits;
use docintake_core::Config;
use docintake_db::{CompanyStore, DocumentStore, DocumentTypeCatalog};
use docintake_storage::Storage;
use std::sync::Arc;

/// Read-side stores used by the document and catalog endpoints.
#[derive(Clone)]
pub struct DbState {
    pub documents: Arc<dyn DocumentStore>,
    pub companies: Arc<dyn CompanyStore>,
    pub document_types: Arc<dyn DocumentTypeCatalog>,
}

/// The upload pipeline and the limits checked before it runs.
#[derive(Clone)]
pub struct IntakeState {
    pub service: Arc<DocumentIntakeService>,
    pub limits: UploadLimits,
}

pub struct AppState {
    pub config: Config,
    pub db: DbState,
    pub intake: IntakeState,
    /// Same backend the intake service writes to; checked by `/health`.
    pub storage: Arc<dyn Storage>,
}

impl axum::extract::FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for IntakeState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.intake.clone()
    }
}

#[allow(dead_code)]
fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
