//! Handlers for venues.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use danza_cache::CacheKeys;
use danza_core::query::pagination::Page;
use danza_core::types::DbId;
use danza_db::models::venue::{CreateVenue, UpdateVenue, VENUE_FIELDS, VENUE_RELATIONS};
use danza_db::repositories::translatable::TranslationOpts;
use danza_db::repositories::venue_repo::VenueEntity;
use danza_db::repositories::{Translated, VenueRepo};
use validator::Validate;

use crate::caching;
use crate::error::{AppError, AppResult};
use crate::query::{GetParams, ListParams};
use crate::response::DataResponse;
use crate::state::AppState;

const KEYS: CacheKeys = CacheKeys::new("venue");

/// Cached course listings can embed the venue via the `venue` eager load.
const COURSE_KEYS: CacheKeys = CacheKeys::new("course");

/// GET /api/v1/venues
pub async fn list_venues(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&VENUE_FIELDS, VENUE_RELATIONS)?;

    let key = KEYS.paginated(&req);
    if let Some(page) = caching::lookup::<Page<Translated<VenueEntity>>>(&state.cache, &key).await
    {
        return Ok(Json(page));
    }

    let page = VenueRepo::paginate(&state.pool, &req, &state.config.default_locale).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// GET /api/v1/venues/{id}
pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<GetParams>,
) -> AppResult<impl IntoResponse> {
    let locale = params.locale()?;

    let opts = TranslationOpts {
        locale: locale.as_ref(),
        include_all: params.include_all_translations,
        default_locale: &state.config.default_locale,
    };
    let venue = VenueRepo::find_by_id(&state.pool, id, opts)
        .await?
        .ok_or(AppError::not_found("Venue", id))?;

    Ok(Json(DataResponse { data: venue }))
}

/// POST /api/v1/venues
pub async fn create_venue(
    State(state): State<AppState>,
    Json(input): Json<CreateVenue>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let venue = VenueRepo::create(&state.pool, &input).await?;

    caching::invalidate(&state.cache, &[KEYS.all_paginated()]).await?;
    tracing::info!(venue_id = venue.entity.id, "Venue created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: venue })))
}

/// PUT /api/v1/venues/{id}
pub async fn update_venue(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVenue>,
) -> AppResult<impl IntoResponse> {
    let venue = VenueRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Venue", id))?;

    caching::invalidate(
        &state.cache,
        &[
            KEYS.by_id(id),
            KEYS.all_paginated(),
            COURSE_KEYS.all_paginated(),
        ],
    )
    .await?;
    tracing::info!(venue_id = id, "Venue updated");

    Ok(Json(DataResponse { data: venue }))
}

/// DELETE /api/v1/venues/{id}
pub async fn delete_venue(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = VenueRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Venue", id));
    }

    caching::invalidate(
        &state.cache,
        &[
            KEYS.by_id(id),
            KEYS.all_paginated(),
            COURSE_KEYS.all_paginated(),
        ],
    )
    .await?;
    tracing::info!(venue_id = id, "Venue deleted");

    Ok(StatusCode::NO_CONTENT)
}
