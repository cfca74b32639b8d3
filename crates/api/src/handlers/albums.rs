//! Handlers for albums.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use danza_cache::CacheKeys;
use danza_core::query::pagination::Page;
use danza_core::types::DbId;
use danza_db::models::album::{Album, CreateAlbum, ALBUM_FIELDS};
use danza_db::repositories::AlbumRepo;

use crate::caching;
use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const KEYS: CacheKeys = CacheKeys::new("album");

/// Cached artist listings can embed albums via the `albums` eager load,
/// so album writes sweep the artist keys as well.
const ARTIST_KEYS: CacheKeys = CacheKeys::new("artist");

/// GET /api/v1/albums
pub async fn list_albums(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&ALBUM_FIELDS, &[])?;

    let key = KEYS.paginated(&req);
    if let Some(page) = caching::lookup::<Page<Album>>(&state.cache, &key).await {
        return Ok(Json(page));
    }

    let page = AlbumRepo::paginate(&state.pool, &req).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// POST /api/v1/albums
pub async fn create_album(
    State(state): State<AppState>,
    Json(input): Json<CreateAlbum>,
) -> AppResult<impl IntoResponse> {
    let album = AlbumRepo::create(&state.pool, &input).await?;

    caching::invalidate(
        &state.cache,
        &[KEYS.all_paginated(), ARTIST_KEYS.all_paginated()],
    )
    .await?;
    tracing::info!(album_id = album.id, artist_id = album.artist_id, "Album created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: album })))
}

/// DELETE /api/v1/albums/{id}
pub async fn delete_album(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = AlbumRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Album", id));
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
    tracing::info!(album_id = id, "Album deleted");

    Ok(StatusCode::NO_CONTENT)
}
