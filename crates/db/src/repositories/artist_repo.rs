//! Repository for the `artists` table.
//!
//! Artist listings demonstrate nested eager loading: `albums` pulls the
//! artist's albums in one batched query, and the `albums.songs` sub-path
//! pulls each album's songs in a second.

use std::collections::HashMap;

use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::album_repo::ALBUM_COLUMNS;
use super::paginate::{paginate_rows, ListSpec};
use super::song_repo::SONG_COLUMNS;
use crate::models::album::Album;
use crate::models::artist::{Artist, CreateArtist, UpdateArtist};
use crate::models::song::Song;

/// Column list for `artists` queries.
const ARTIST_COLUMNS: &str = "id, name, country, created_at, updated_at";

/// An album plus optionally its songs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumWithSongs {
    #[serde(flatten)]
    pub album: Album,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub songs: Option<Vec<Song>>,
}

/// An artist plus optionally its eager-loaded albums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albums: Option<Vec<AlbumWithSongs>>,
}

/// Provides CRUD and listing operations for artists.
pub struct ArtistRepo;

impl ArtistRepo {
    pub async fn create(pool: &PgPool, input: &CreateArtist) -> Result<Artist, sqlx::Error> {
        let query = format!(
            "INSERT INTO artists (name, country) VALUES ($1, $2) RETURNING {ARTIST_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(&input.name)
            .bind(input.country.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArtist,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!(
            "UPDATE artists SET \
                 name = COALESCE($2, name), \
                 country = COALESCE($3, country), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {ARTIST_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.country.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Fetch one artist, honoring the same relation map as listings.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        req: &ListRequest,
    ) -> Result<Option<ArtistDetail>, sqlx::Error> {
        let query = format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = $1");
        let artist: Option<Artist> = sqlx::query_as(&query).bind(id).fetch_optional(pool).await?;
        let Some(artist) = artist else {
            return Ok(None);
        };
        let mut details = Self::load_relations(pool, vec![artist], req).await?;
        Ok(details.pop())
    }

    /// Paginated artist listing with batched album/song eager loading.
    pub async fn paginate(
        pool: &PgPool,
        req: &ListRequest,
    ) -> Result<Page<ArtistDetail>, sqlx::Error> {
        let spec = ListSpec {
            table: "artists",
            columns: ARTIST_COLUMNS,
            scope: None,
        };
        let page: Page<Artist> = paginate_rows(pool, &spec, req).await?;
        let Page {
            data,
            total,
            page: page_no,
            limit,
            total_pages,
            has_next,
            has_prev,
        } = page;
        let details = Self::load_relations(pool, data, req).await?;
        Ok(Page {
            data: details,
            total,
            page: page_no,
            limit,
            total_pages,
            has_next,
            has_prev,
        })
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM artists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Batch-load the relations named in the request: one query for all
    /// albums, one for all songs, grouped in process.
    async fn load_relations(
        pool: &PgPool,
        artists: Vec<Artist>,
        req: &ListRequest,
    ) -> Result<Vec<ArtistDetail>, sqlx::Error> {
        let want_albums = req.relations.contains("albums");
        if !want_albums || artists.is_empty() {
            return Ok(artists
                .into_iter()
                .map(|artist| ArtistDetail {
                    artist,
                    albums: None,
                })
                .collect());
        }
        let want_songs = req
            .relations
            .children("albums")
            .iter()
            .any(|child| child == "songs");

        let artist_ids: Vec<DbId> = artists.iter().map(|a| a.id).collect();
        let query = format!(
            "SELECT {ALBUM_COLUMNS} FROM albums \
             WHERE artist_id = ANY($1) \
             ORDER BY artist_id, released_on, id"
        );
        let albums: Vec<Album> = sqlx::query_as(&query)
            .bind(&artist_ids)
            .fetch_all(pool)
            .await?;

        let mut songs_by_album: HashMap<DbId, Vec<Song>> = HashMap::new();
        if want_songs && !albums.is_empty() {
            let album_ids: Vec<DbId> = albums.iter().map(|a| a.id).collect();
            let query = format!(
                "SELECT {SONG_COLUMNS} FROM songs \
                 WHERE album_id = ANY($1) \
                 ORDER BY album_id, id"
            );
            let songs: Vec<Song> = sqlx::query_as(&query)
                .bind(&album_ids)
                .fetch_all(pool)
                .await?;
            for song in songs {
                songs_by_album.entry(song.album_id).or_default().push(song);
            }
        }

        let mut albums_by_artist: HashMap<DbId, Vec<AlbumWithSongs>> = HashMap::new();
        for album in albums {
            let songs =
                want_songs.then(|| songs_by_album.remove(&album.id).unwrap_or_default());
            albums_by_artist
                .entry(album.artist_id)
                .or_default()
                .push(AlbumWithSongs { album, songs });
        }

        Ok(artists
            .into_iter()
            .map(|artist| {
                let albums = albums_by_artist.remove(&artist.id).unwrap_or_default();
                ArtistDetail {
                    artist,
                    albums: Some(albums),
                }
            })
            .collect())
    }
}
