use docintake_core::models::DispatchFailure;
use docintake_core::AppError;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct DispatchFailureRepository {
    pool: PgPool,
}

impl DispatchFailureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(
        skip(self, error, payload),
        fields(db.table = "dispatch_failures", db.operation = "insert")
    )]
    pub async fn record(
        &self,
        document_id: Uuid,
        company_id: Uuid,
        backend: &str,
        error: &str,
        payload: JsonValue,
    ) -> Result<DispatchFailure, AppError> {
        let failure = sqlx::query_as::<Postgres, DispatchFailure>(
            r#"
            INSERT INTO dispatch_failures (document_id, company_id, backend, error, payload)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, document_id, company_id, backend, error, payload, created_at
            "#,
        )
        .bind(document_id)
        .bind(company_id)
        .bind(backend)
        .bind(error)
        .bind(payload)
        .fetch_one(&self.pool)
        .await?;

        Ok(failure)
    }

    #[tracing::instrument(skip(self), fields(db.table = "dispatch_failures", db.operation = "select"))]
    pub async fn list_for_document(&self, document_id: Uuid) -> Result<Vec<DispatchFailure>, AppError> {
        let failures = sqlx::query_as::<Postgres, DispatchFailure>(
            r#"
            SELECT id, document_id, company_id, backend, error, payload, created_at
            FROM dispatch_failures
            WHERE document_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(failures)
    }
}
