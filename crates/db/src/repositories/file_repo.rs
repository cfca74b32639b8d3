//! Repository for the `stored_files` metadata table.

use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use sqlx::PgPool;

use super::paginate::{paginate_rows, ListSpec};
use crate::models::stored_file::{CreateStoredFile, StoredFile};

/// Column list for `stored_files` queries.
const FILE_COLUMNS: &str =
    "id, owner_id, file_name, content_type, size_bytes, storage_key, created_at";

/// Provides stored-file metadata operations.
pub struct FileRepo;

impl FileRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateStoredFile,
    ) -> Result<StoredFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO stored_files (owner_id, file_name, content_type, size_bytes, storage_key) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {FILE_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(input.owner_id)
            .bind(&input.file_name)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .bind(&input.storage_key)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StoredFile>, sqlx::Error> {
        let query = format!("SELECT {FILE_COLUMNS} FROM stored_files WHERE id = $1");
        sqlx::query_as(&query).bind(id).fetch_optional(pool).await
    }

    /// One user's files.
    pub async fn paginate_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        req: &ListRequest,
    ) -> Result<Page<StoredFile>, sqlx::Error> {
        let spec = ListSpec {
            table: "stored_files",
            columns: FILE_COLUMNS,
            scope: Some(("owner_id", owner_id)),
        };
        paginate_rows(pool, &spec, req).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stored_files WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
