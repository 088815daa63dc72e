use docintake_core::models::Company;
use docintake_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "companies", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<Postgres, Company>(
            r#"
            SELECT id, name, business_id, created_by, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    /// Companies are registered by the onboarding flow; intake only reads them.
    /// Used by seeding scripts and tests.
    #[tracing::instrument(skip(self), fields(db.table = "companies", db.operation = "insert"))]
    pub async fn create(
        &self,
        name: &str,
        business_id: Option<&str>,
        created_by: Uuid,
    ) -> Result<Company, AppError> {
        let company = sqlx::query_as::<Postgres, Company>(
            r#"
            INSERT INTO companies (name, business_id, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, business_id, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(business_id)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(company)
    }
}
