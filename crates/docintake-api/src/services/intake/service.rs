use std::sync::Arc;

use docintake_core::models::{
    AnalysisRequest, Company, Document, DocumentMetadata, NewDocument, OverrideInfo,
};
use docintake_core::{AppError, Classifier};
use docintake_db::{CompanyStore, DispatchFailureStore, DocumentStore};
use docintake_storage::Storage;
use serde_json::Map as JsonMap;
use uuid::Uuid;

use crate::auth::{ensure_company_access, IdentityContext};
use crate::error::storage_error_to_app_error;
use crate::services::dispatch::{dispatch_isolated, AnalysisDispatcher};
use crate::services::notification::{spawn_notification, Notifier, UploadNotification};

use super::types::{IntakeOutcome, IntakeSubmission};

/// Collaborators of the intake pipeline, all behind traits.
#[derive(Clone)]
pub struct IntakeDependencies {
    pub storage: Arc<dyn Storage>,
    pub documents: Arc<dyn DocumentStore>,
    pub companies: Arc<dyn CompanyStore>,
    pub dispatcher: Arc<dyn AnalysisDispatcher>,
    pub dispatch_failures: Arc<dyn DispatchFailureStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// Orchestrates one document upload.
///
/// Storage and database writes happen only after the ownership guard passed.
/// The storage write and the row insert form a two-step saga: if the insert
/// fails the object is deleted again (see [`Self::persist_or_compensate`]).
pub struct DocumentIntakeService {
    deps: IntakeDependencies,
    classifier: Classifier,
}

impl DocumentIntakeService {
    pub fn new(deps: IntakeDependencies, classifier: Classifier) -> Self {
        Self { deps, classifier }
    }

    pub fn companies(&self) -> &dyn CompanyStore {
        self.deps.companies.as_ref()
    }

    pub fn documents(&self) -> &dyn DocumentStore {
        self.deps.documents.as_ref()
    }

    pub async fn intake(
        &self,
        identity: &IdentityContext,
        submission: IntakeSubmission,
    ) -> Result<IntakeOutcome, AppError> {
        let company =
            ensure_company_access(identity, self.deps.companies.as_ref(), submission.company_id)
                .await?;

        let manual_selection = submission
            .manual_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        let classification = self.classifier.classify_detailed(
            &submission.original_filename,
            Some(submission.fiscal_year),
            manual_selection.as_deref(),
        );
        let document_type = classification.document_type;

        tracing::info!(
            company_id = %company.id,
            original_filename = %submission.original_filename,
            document_type = %document_type,
            rule = classification.rule,
            manual_override = classification.manual_override_applied,
            "Document classified"
        );

        let file_size = submission.data.len() as i64;
        let storage_path = self
            .deps
            .storage
            .upload_document(
                company.id,
                &submission.original_filename,
                &submission.content_type,
                submission.data,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, company_id = %company.id, "Failed to upload document to storage");
                storage_error_to_app_error(e)
            })?;

        tracing::info!(storage_key = %storage_path, file_size, "Upload to storage successful");

        let metadata = DocumentMetadata {
            detected_type: document_type,
            is_manual_selection: classification.manual_override_applied,
            original_manual_selection: manual_selection.clone(),
            locale: submission.locale,
            matched_rule: Some(classification.rule.to_string()),
            extra: JsonMap::new(),
        };

        let new_document = NewDocument {
            id: Uuid::new_v4(),
            company_id: company.id,
            document_type,
            original_filename: submission.original_filename.clone(),
            storage_path,
            mime_type: submission.content_type.clone(),
            file_size,
            fiscal_year: submission.fiscal_year,
            fiscal_period: submission.fiscal_period.clone(),
            uploaded_by: identity.user_id,
            metadata,
        };

        let document = self.persist_or_compensate(new_document).await?;

        let request = AnalysisRequest {
            document_id: document.id,
            company_id: company.id,
            locale: submission.locale,
            override_info: OverrideInfo {
                detected_type: document_type,
                is_manual_selection: classification.manual_override_applied,
                original_manual_selection: manual_selection,
            },
        };
        let analysis_dispatched = dispatch_isolated(
            self.deps.dispatcher.as_ref(),
            self.deps.dispatch_failures.as_ref(),
            &request,
        )
        .await;

        spawn_notification(
            self.deps.notifier.clone(),
            upload_notification(identity, &company, &document, submission.locale),
        );

        Ok(IntakeOutcome {
            document,
            classification,
            analysis_dispatched,
        })
    }

    /// Insert the row; on failure delete the already stored object.
    ///
    /// The caller always gets the persistence error. A failed compensating
    /// delete leaves an orphaned object, which is logged with its key.
    pub async fn persist_or_compensate(&self, new: NewDocument) -> Result<Document, AppError> {
        let storage_path = new.storage_path.clone();
        let document_id = new.id;

        match self.deps.documents.create(new).await {
            Ok(document) => {
                tracing::info!(
                    document_id = %document.id,
                    company_id = %document.company_id,
                    "Document recorded"
                );
                Ok(document)
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    document_id = %document_id,
                    storage_key = %storage_path,
                    "Failed to record document, removing stored object"
                );
                if let Err(cleanup_err) = self.deps.storage.delete(&storage_path).await {
                    tracing::error!(
                        error = %cleanup_err,
                        storage_key = %storage_path,
                        "Compensating delete failed, object orphaned"
                    );
                }
                Err(err)
            }
        }
    }
}

fn upload_notification(
    identity: &IdentityContext,
    company: &Company,
    document: &Document,
    locale: docintake_core::models::Locale,
) -> UploadNotification {
    UploadNotification {
        company_id: company.id,
        company_name: company.name.clone(),
        recipient_email: identity.email.clone(),
        recipient_name: identity.name.clone(),
        original_filename: document.original_filename.clone(),
        document_type: document.document_type,
        locale,
    }
}
