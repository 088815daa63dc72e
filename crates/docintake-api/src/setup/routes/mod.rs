//! Route configuration and setup.
//!
//! Health checks live in [health](health).

mod health;

use crate::auth::middleware::{auth_middleware, AuthState};
use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use docintake_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = AuthState::new(config.jwt_secret(), config.jwt_issuer());

    let public_routes = public_routes();
    let protected_routes = protected_routes().layer(axum::middleware::from_fn_with_state(
        Arc::new(auth_state),
        auth_middleware,
    ));

    let http_concurrency_limit = config.http_concurrency_limit();
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    // The multipart envelope is allowed on top of the document itself so an
    // oversized file still reaches the handler's size check.
    let body_limit = config.max_document_size_bytes() + MULTIPART_OVERHEAD_BYTES;

    let app = public_routes
        .merge(protected_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/health",
            get(|State(state): State<Arc<AppState>>| async move {
                health::health_check(state).await
            }),
        )
        .route("/live", get(health::liveness_check))
        .route(
            "/ready",
            get(|State(state): State<Arc<AppState>>| async move {
                health::readiness_check(state).await
            }),
        )
        .route("/api/openapi.json", get(openapi_json))
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/documents", API_PREFIX),
            post(handlers::document_upload::upload_document),
        )
        .route(
            &format!("{}/documents/{{id}}", API_PREFIX),
            get(handlers::document_get::get_document),
        )
        .route(
            &format!("{}/companies/{{company_id}}/documents", API_PREFIX),
            get(handlers::document_get::list_company_documents),
        )
        .route(
            &format!("{}/document-types", API_PREFIX),
            get(handlers::document_types::list_document_types),
        )
}

async fn openapi_json() -> impl IntoResponse {
    Json(crate::api_doc::get_openapi_spec())
}
