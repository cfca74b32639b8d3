//! Handlers for artists.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use danza_cache::CacheKeys;
use danza_core::query::pagination::Page;
use danza_core::query::relations::RelationMap;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use danza_db::models::artist::{CreateArtist, UpdateArtist, ARTIST_FIELDS, ARTIST_RELATIONS};
use danza_db::repositories::{ArtistDetail, ArtistRepo};

use crate::caching;
use crate::error::{AppError, AppResult};
use crate::query::{GetParams, ListParams};
use crate::response::DataResponse;
use crate::state::AppState;

const KEYS: CacheKeys = CacheKeys::new("artist");

/// GET /api/v1/artists
///
/// Paginated artist listing; `include=albums` or `include=albums.songs`
/// eager-loads the catalog beneath each artist.
pub async fn list_artists(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&ARTIST_FIELDS, ARTIST_RELATIONS)?;

    let key = KEYS.paginated(&req);
    if let Some(page) = caching::lookup::<Page<ArtistDetail>>(&state.cache, &key).await {
        return Ok(Json(page));
    }

    let page = ArtistRepo::paginate(&state.pool, &req).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// GET /api/v1/artists/{id}
pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<GetParams>,
) -> AppResult<impl IntoResponse> {
    let mut req = ListRequest::unfiltered();
    if let Some(include) = params.include.as_deref() {
        let relations = RelationMap::decode_param(include);
        relations
            .ensure_allowed("Artist", ARTIST_RELATIONS)
            .map_err(AppError::from)?;
        req.relations = relations;
    }

    // Eager-loaded views vary per request; only the bare artist is
    // cached under the byId key.
    let cacheable = req.relations.is_empty();
    let key = KEYS.by_id(id);
    if cacheable {
        if let Some(hit) = caching::lookup::<ArtistDetail>(&state.cache, &key).await {
            return Ok(Json(DataResponse { data: hit }));
        }
    }

    let artist = ArtistRepo::find_by_id(&state.pool, id, &req)
        .await?
        .ok_or(AppError::not_found("Artist", id))?;

    if cacheable {
        caching::fill(&state.cache, &key, &artist).await;
    }

    Ok(Json(DataResponse { data: artist }))
}

/// POST /api/v1/artists
pub async fn create_artist(
    State(state): State<AppState>,
    Json(input): Json<CreateArtist>,
) -> AppResult<impl IntoResponse> {
    let artist = ArtistRepo::create(&state.pool, &input).await?;

    caching::invalidate(&state.cache, &[KEYS.all_paginated()]).await?;
    tracing::info!(artist_id = artist.id, "Artist created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: artist })))
}

/// PUT /api/v1/artists/{id}
pub async fn update_artist(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArtist>,
) -> AppResult<impl IntoResponse> {
    let artist = ArtistRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Artist", id))?;

    caching::invalidate(&state.cache, &[KEYS.by_id(id), KEYS.all_paginated()]).await?;
    tracing::info!(artist_id = id, "Artist updated");

    Ok(Json(DataResponse { data: artist }))
}

/// DELETE /api/v1/artists/{id}
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = ArtistRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Artist", id));
    }

    caching::invalidate(&state.cache, &[KEYS.by_id(id), KEYS.all_paginated()]).await?;
    tracing::info!(artist_id = id, "Artist deleted");

    Ok(StatusCode::NO_CONTENT)
}
