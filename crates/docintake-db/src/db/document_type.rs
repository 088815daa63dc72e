use docintake_core::models::{DocumentType, DocumentTypeEntry};
use docintake_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Read access to the `document_types` lookup table (seeded by migration).
#[derive(Clone)]
pub struct DocumentTypeRepository {
    pool: PgPool,
}

impl DocumentTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "document_types", db.operation = "select"))]
    pub async fn list(&self) -> Result<Vec<DocumentTypeEntry>, AppError> {
        let entries = sqlx::query_as::<Postgres, DocumentTypeEntry>(
            r#"
            SELECT id, code, name_fi, name_sv, name_en, sort_order
            FROM document_types
            ORDER BY sort_order ASC, code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    #[tracing::instrument(skip(self), fields(db.table = "document_types", db.operation = "select"))]
    pub async fn resolve_id(&self, document_type: DocumentType) -> Result<Option<Uuid>, AppError> {
        let id = sqlx::query_scalar::<Postgres, Uuid>("SELECT id FROM document_types WHERE code = $1")
            .bind(document_type.code())
            .fetch_optional(&self.pool)
            .await?;

        Ok(id)
    }
}
