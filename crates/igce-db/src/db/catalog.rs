use async_trait::async_trait;
use igce_core::{models::Database, AppError, DatabaseCatalog};
use sqlx::{PgPool, Postgres};

/// Repository for registered upload target databases
#[derive(Clone)]
pub struct DatabaseRepository {
    pool: PgPool,
}

impl DatabaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseCatalog for DatabaseRepository {
    #[tracing::instrument(skip(self), fields(db.table = "dbs", db.operation = "select"))]
    async fn csv_enabled_databases(&self) -> Result<Vec<Database>, AppError> {
        let databases = sqlx::query_as::<Postgres, Database>(
            r#"
            SELECT id, database_name, allow_csv_upload, schemas_allowed_for_csv_upload
            FROM dbs
            WHERE allow_csv_upload = TRUE
            ORDER BY database_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(databases)
    }

    #[tracing::instrument(skip(self), fields(db.table = "dbs", db.operation = "select", db.record_id = %id))]
    async fn get_database(&self, id: i32) -> Result<Option<Database>, AppError> {
        let database = sqlx::query_as::<Postgres, Database>(
            "SELECT id, database_name, allow_csv_upload, schemas_allowed_for_csv_upload FROM dbs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(database)
    }
}
