use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileRecord, NewFileRecord};

use super::FileStore;

/// Postgres-backed file store.
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO files (id, owner_id, storage_key, original_filename, mime_type, file_size, original_created_at, effective_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(&record.owner_id)
        .bind(&record.storage_key)
        .bind(&record.original_filename)
        .bind(&record.mime_type)
        .bind(record.file_size)
        .bind(record.original_created_at)
        .bind(record.effective_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Upload is already confirmed".to_string())
            }
            _ => AppError::Database(e),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn mark_trashed(
        &self,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(
            r#"
            UPDATE files
            SET deleted_at = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(deleted_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn mark_restored(&self, id: Uuid) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(
            r#"
            UPDATE files
            SET deleted_at = NULL, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NOT NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_trashed(&self, id: Uuid) -> Result<bool> {
        // Permission grants go with the row via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM files WHERE id = $1 AND deleted_at IS NOT NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_active(&self, owner_id: &str) -> Result<Vec<FileRecord>> {
        let records = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT * FROM files
            WHERE owner_id = $1 AND deleted_at IS NULL
            ORDER BY effective_date DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_trashed(&self, owner_id: &str) -> Result<Vec<FileRecord>> {
        let records = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT * FROM files
            WHERE owner_id = $1 AND deleted_at IS NOT NULL
            ORDER BY deleted_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn has_read_grant(&self, file_id: Uuid, user_id: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM file_permissions WHERE file_id = $1 AND user_id = $2)",
        )
        .bind(file_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
