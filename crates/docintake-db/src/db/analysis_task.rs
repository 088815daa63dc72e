use docintake_core::models::AnalysisRequest;
use docintake_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// `analysis_tasks` rows are picked up by a polling worker outside this service.
#[derive(Clone)]
pub struct AnalysisTaskRepository {
    pool: PgPool,
}

impl AnalysisTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(db.table = "analysis_tasks", db.operation = "insert", document_id = %request.document_id)
    )]
    pub async fn enqueue(&self, request: &AnalysisRequest) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO analysis_tasks (document_id, company_id, payload, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING id
            "#,
        )
        .bind(request.document_id)
        .bind(request.company_id)
        .bind(request.to_json_value())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Number of tasks still waiting for a worker.
    pub async fn count_pending(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM analysis_tasks WHERE status = 'pending'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
