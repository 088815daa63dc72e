//! Analysis dispatch
//!
//! After a document is recorded, an analysis request is handed to an external
//! worker. Delivery is best-effort: [`dispatch_isolated`] logs the outcome and
//! records failures in the `dispatch_failures` ledger, but never fails the
//! intake.

use async_trait::async_trait;
use docintake_core::models::AnalysisRequest;
use docintake_core::{AppError, Config, DispatchBackend};
use docintake_db::{AnalysisTaskStore, DispatchFailureStore};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Event name understood by the analysis worker
pub const ANALYZE_EVENT_NAME: &str = "document/analyze.requested";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Event endpoint unreachable: {0}")]
    Transport(String),

    #[error("Event endpoint rejected request: {status} - {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to queue analysis task: {0}")]
    Queue(String),

    #[error("Dispatcher misconfigured: {0}")]
    Config(String),
}

#[async_trait]
pub trait AnalysisDispatcher: Send + Sync {
    async fn dispatch(&self, request: &AnalysisRequest) -> Result<(), DispatchError>;

    /// Backend name stored with ledger entries
    fn backend_name(&self) -> &'static str;
}

/// POSTs `{"name": ..., "data": ...}` to an event ingestion endpoint.
pub struct HttpEventDispatcher {
    client: Client,
    url: String,
    event_key: Option<String>,
}

impl HttpEventDispatcher {
    pub fn new(
        url: impl Into<String>,
        event_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            event_key,
        })
    }
}

#[async_trait]
impl AnalysisDispatcher for HttpEventDispatcher {
    async fn dispatch(&self, request: &AnalysisRequest) -> Result<(), DispatchError> {
        let body = json!({
            "name": ANALYZE_EVENT_NAME,
            "data": request.to_json_value(),
        });

        let mut builder = self.client.post(&self.url).json(&body);
        if let Some(ref key) = self.event_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

/// Inserts an `analysis_tasks` row for a polling worker.
pub struct TaskTableDispatcher {
    tasks: Arc<dyn AnalysisTaskStore>,
}

impl TaskTableDispatcher {
    pub fn new(tasks: Arc<dyn AnalysisTaskStore>) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl AnalysisDispatcher for TaskTableDispatcher {
    async fn dispatch(&self, request: &AnalysisRequest) -> Result<(), DispatchError> {
        let task_id = self
            .tasks
            .enqueue(request)
            .await
            .map_err(|e| DispatchError::Queue(e.to_string()))?;
        tracing::debug!(task_id = %task_id, document_id = %request.document_id, "Analysis task queued");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "database"
    }
}

pub struct DisabledDispatcher;

#[async_trait]
impl AnalysisDispatcher for DisabledDispatcher {
    async fn dispatch(&self, request: &AnalysisRequest) -> Result<(), DispatchError> {
        tracing::debug!(
            document_id = %request.document_id,
            "Analysis dispatch disabled, skipping"
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "disabled"
    }
}

/// Build the dispatcher selected by `ANALYSIS_DISPATCH_BACKEND`.
pub fn create_dispatcher(
    config: &Config,
    tasks: Arc<dyn AnalysisTaskStore>,
) -> Result<Arc<dyn AnalysisDispatcher>, DispatchError> {
    let dispatcher: Arc<dyn AnalysisDispatcher> = match config.analysis_dispatch_backend() {
        DispatchBackend::Http => {
            let url = config.analysis_event_url().ok_or_else(|| {
                DispatchError::Config("ANALYSIS_EVENT_URL is required for http dispatch".into())
            })?;
            Arc::new(HttpEventDispatcher::new(
                url,
                config.analysis_event_key().map(String::from),
                Duration::from_secs(config.analysis_dispatch_timeout_secs()),
            )?)
        }
        DispatchBackend::Database => Arc::new(TaskTableDispatcher::new(tasks)),
        DispatchBackend::Disabled => Arc::new(DisabledDispatcher),
    };

    tracing::info!(backend = dispatcher.backend_name(), "Analysis dispatcher configured");
    Ok(dispatcher)
}

/// Attempt a dispatch and contain its outcome.
///
/// Returns whether the request was delivered. A failure is logged and written
/// to the ledger; a failed ledger write is only logged.
pub async fn dispatch_isolated(
    dispatcher: &dyn AnalysisDispatcher,
    failures: &dyn DispatchFailureStore,
    request: &AnalysisRequest,
) -> bool {
    match dispatcher.dispatch(request).await {
        Ok(()) => {
            tracing::info!(
                document_id = %request.document_id,
                company_id = %request.company_id,
                backend = dispatcher.backend_name(),
                "Analysis requested"
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                document_id = %request.document_id,
                company_id = %request.company_id,
                backend = dispatcher.backend_name(),
                "Analysis dispatch failed, document stays pending"
            );
            if let Err(ledger_err) = record_failure(failures, dispatcher, request, &e).await {
                tracing::error!(
                    error = %ledger_err,
                    document_id = %request.document_id,
                    "Failed to record dispatch failure"
                );
            }
            false
        }
    }
}

async fn record_failure(
    failures: &dyn DispatchFailureStore,
    dispatcher: &dyn AnalysisDispatcher,
    request: &AnalysisRequest,
    error: &DispatchError,
) -> Result<(), AppError> {
    failures
        .record(
            request.document_id,
            request.company_id,
            dispatcher.backend_name(),
            &error.to_string(),
            request.to_json_value(),
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docintake_core::models::{DocumentType, Locale, OverrideInfo};
    use mockito::Matcher;
    use uuid::Uuid;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            document_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            locale: Locale::Fi,
            override_info: OverrideInfo {
                detected_type: DocumentType::LeasingDocument,
                is_manual_selection: false,
                original_manual_selection: None,
            },
        }
    }

    #[tokio::test]
    async fn test_http_dispatch_posts_named_event_with_bearer_key() {
        let mut server = mockito::Server::new_async().await;
        let request = request();
        let mock = server
            .mock("POST", "/e/intake")
            .match_header("authorization", "Bearer event-key")
            .match_body(Matcher::PartialJson(json!({
                "name": "document/analyze.requested",
                "data": {
                    "document_id": request.document_id.to_string(),
                    "locale": "fi",
                    "override_info": {"detected_type": "leasing_document"}
                }
            })))
            .with_status(200)
            .with_body(r#"{"ids":["01J"]}"#)
            .create_async()
            .await;

        let dispatcher = HttpEventDispatcher::new(
            format!("{}/e/intake", server.url()),
            Some("event-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        dispatcher.dispatch(&request).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_dispatch_non_success_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/e/intake")
            .with_status(503)
            .with_body("queue unavailable")
            .create_async()
            .await;

        let dispatcher = HttpEventDispatcher::new(
            format!("{}/e/intake", server.url()),
            None,
            Duration::from_secs(5),
        )
        .unwrap();

        let err = dispatcher.dispatch(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Rejected { status: 503, ref body } if body == "queue unavailable"
        ));
    }

    #[tokio::test]
    async fn test_disabled_dispatcher_succeeds() {
        assert!(DisabledDispatcher.dispatch(&request()).await.is_ok());
        assert_eq!(DisabledDispatcher.backend_name(), "disabled");
    }
}
