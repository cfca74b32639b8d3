//! Repository for the `albums` table.

use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use sqlx::PgPool;

use super::paginate::{paginate_rows, ListSpec};
use crate::models::album::{Album, CreateAlbum};

/// Column list for `albums` queries.
pub(crate) const ALBUM_COLUMNS: &str = "id, artist_id, title, released_on, created_at";

/// Provides CRUD operations for albums.
pub struct AlbumRepo;

impl AlbumRepo {
    pub async fn create(pool: &PgPool, input: &CreateAlbum) -> Result<Album, sqlx::Error> {
        let query = format!(
            "INSERT INTO albums (artist_id, title, released_on) \
             VALUES ($1, $2, $3) \
             RETURNING {ALBUM_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(input.artist_id)
            .bind(&input.title)
            .bind(input.released_on)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Album>, sqlx::Error> {
        let query = format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE id = $1");
        sqlx::query_as(&query).bind(id).fetch_optional(pool).await
    }

    pub async fn paginate(pool: &PgPool, req: &ListRequest) -> Result<Page<Album>, sqlx::Error> {
        let spec = ListSpec {
            table: "albums",
            columns: ALBUM_COLUMNS,
            scope: None,
        };
        paginate_rows(pool, &spec, req).await
    }

    /// Delete an album. Songs cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
