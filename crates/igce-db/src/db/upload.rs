use async_trait::async_trait;
use igce_core::{
    models::{NewUploadRecord, UploadKind, UploadRecord},
    AppError, UploadStore,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for the log of accepted uploads
#[derive(Clone)]
pub struct UploadRepository {
    pool: PgPool,
}

impl UploadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UploadStore for UploadRepository {
    #[tracing::instrument(skip(self, record), fields(db.table = "csv_uploads", db.operation = "insert", db.record_id = %record.id))]
    async fn record_upload(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError> {
        let stored = sqlx::query_as::<Postgres, UploadRecord>(
            r#"
            INSERT INTO csv_uploads (
                id, kind, user_id, database_id, schema_name,
                original_filename, stored_path, size_bytes, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, kind, user_id, database_id, schema_name,
                      original_filename, stored_path, size_bytes, metadata, uploaded_at
            "#,
        )
        .bind(record.id)
        .bind(record.kind)
        .bind(record.user_id)
        .bind(record.database_id)
        .bind(&record.schema_name)
        .bind(&record.original_filename)
        .bind(&record.stored_path)
        .bind(record.size_bytes)
        .bind(&record.metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    #[tracing::instrument(skip(self), fields(db.table = "csv_uploads", db.operation = "select"))]
    async fn recent_uploads(
        &self,
        kind: UploadKind,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<UploadRecord>, AppError> {
        let uploads = sqlx::query_as::<Postgres, UploadRecord>(
            r#"
            SELECT id, kind, user_id, database_id, schema_name,
                   original_filename, stored_path, size_bytes, metadata, uploaded_at
            FROM csv_uploads
            WHERE kind = $1 AND user_id = $2
            ORDER BY uploaded_at DESC
            LIMIT $3
            "#,
        )
        .bind(kind)
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(uploads)
    }
}
