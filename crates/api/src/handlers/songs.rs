//! Handlers for songs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use danza_cache::CacheKeys;
use danza_core::query::pagination::Page;
use danza_core::types::DbId;
use danza_db::models::song::{CreateSong, Song, SONG_FIELDS};
use danza_db::repositories::SongRepo;

use crate::caching;
use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const KEYS: CacheKeys = CacheKeys::new("song");

/// Cached artist listings can embed songs via `albums.songs`.
const ARTIST_KEYS: CacheKeys = CacheKeys::new("artist");

/// GET /api/v1/songs
///
/// Filterable by album, title, duration, and bpm (e.g.
/// `{"field":"bpm","operator":"gte","value":120}` for faster material).
pub async fn list_songs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&SONG_FIELDS, &[])?;

    let key = KEYS.paginated(&req);
    if let Some(page) = caching::lookup::<Page<Song>>(&state.cache, &key).await {
        return Ok(Json(page));
    }

    let page = SongRepo::paginate(&state.pool, &req).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// POST /api/v1/songs
pub async fn create_song(
    State(state): State<AppState>,
    Json(input): Json<CreateSong>,
) -> AppResult<impl IntoResponse> {
    let song = SongRepo::create(&state.pool, &input).await?;

    caching::invalidate(
        &state.cache,
        &[KEYS.all_paginated(), ARTIST_KEYS.all_paginated()],
    )
    .await?;
    tracing::info!(song_id = song.id, album_id = song.album_id, "Song created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: song })))
}

/// DELETE /api/v1/songs/{id}
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = SongRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Song", id));
    }

    caching::invalidate(
        &state.cache,
        &[
            KEYS.by_id(id),
            KEYS.all_paginated(),
            ARTIST_KEYS.all_paginated(),
        ],
    )
    .await?;
    tracing::info!(song_id = id, "Song deleted");

    Ok(StatusCode::NO_CONTENT)
}
