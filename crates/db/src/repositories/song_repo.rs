//! Repository for the `songs` table.

use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use sqlx::PgPool;

use super::paginate::{paginate_rows, ListSpec};
use crate::models::song::{CreateSong, Song};

/// Column list for `songs` queries.
pub(crate) const SONG_COLUMNS: &str = "id, album_id, title, duration_secs, bpm, created_at";

/// Provides CRUD operations for songs.
pub struct SongRepo;

impl SongRepo {
    pub async fn create(pool: &PgPool, input: &CreateSong) -> Result<Song, sqlx::Error> {
        let query = format!(
            "INSERT INTO songs (album_id, title, duration_secs, bpm) \
             VALUES ($1, $2, COALESCE($3, 0), $4) \
             RETURNING {SONG_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(input.album_id)
            .bind(&input.title)
            .bind(input.duration_secs)
            .bind(input.bpm)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Song>, sqlx::Error> {
        let query = format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = $1");
        sqlx::query_as(&query).bind(id).fetch_optional(pool).await
    }

    pub async fn paginate(pool: &PgPool, req: &ListRequest) -> Result<Page<Song>, sqlx::Error> {
        let spec = ListSpec {
            table: "songs",
            columns: SONG_COLUMNS,
            scope: None,
        };
        paginate_rows(pool, &spec, req).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
