use docintake_core::models::{Document, DocumentRow, NewDocument};
use docintake_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const DOCUMENT_COLUMNS: &str = "id, company_id, document_type, document_type_id, original_filename, \
     storage_path, mime_type, file_size, fiscal_year, fiscal_period, uploaded_by, status, \
     metadata, created_at, updated_at";

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new document with status `pending`.
    ///
    /// `document_type_id` is looked up from the catalog in the same statement;
    /// a code missing from `document_types` is stored with a NULL id.
    #[tracing::instrument(
        skip(self, new),
        fields(db.table = "documents", db.operation = "insert", db.record_id = %new.id)
    )]
    pub async fn create(&self, new: NewDocument) -> Result<Document, AppError> {
        let query = format!(
            r#"
            INSERT INTO documents (
                id, company_id, document_type, document_type_id, original_filename,
                storage_path, mime_type, file_size, fiscal_year, fiscal_period,
                uploaded_by, status, metadata
            )
            VALUES (
                $1, $2, $3, (SELECT id FROM document_types WHERE code = $3), $4,
                $5, $6, $7, $8, $9,
                $10, 'pending', $11
            )
            RETURNING {}
            "#,
            DOCUMENT_COLUMNS
        );

        let row = sqlx::query_as::<Postgres, DocumentRow>(&query)
            .bind(new.id)
            .bind(new.company_id)
            .bind(new.document_type.code())
            .bind(&new.original_filename)
            .bind(&new.storage_path)
            .bind(&new.mime_type)
            .bind(new.file_size)
            .bind(new.fiscal_year)
            .bind(&new.fiscal_period)
            .bind(new.uploaded_by)
            .bind(new.metadata.to_json_value())
            .fetch_one(&self.pool)
            .await?;

        if row.document_type_id.is_none() {
            tracing::warn!(
                document_type = %new.document_type,
                "Document type missing from catalog, stored without document_type_id"
            );
        }

        Ok(Document::from(row))
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let query = format!("SELECT {} FROM documents WHERE id = $1", DOCUMENT_COLUMNS);
        let row = sqlx::query_as::<Postgres, DocumentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Document::from))
    }

    /// Documents of one company, newest first.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    pub async fn list_for_company(
        &self,
        company_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>, AppError> {
        let query = format!(
            r#"
            SELECT {}
            FROM documents
            WHERE company_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            DOCUMENT_COLUMNS
        );
        let rows = sqlx::query_as::<Postgres, DocumentRow>(&query)
            .bind(company_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
