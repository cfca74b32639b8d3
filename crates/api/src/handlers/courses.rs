//! Handlers for courses.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use danza_cache::CacheKeys;
use danza_core::query::pagination::Page;
use danza_core::types::DbId;
use danza_db::models::course::{CreateCourse, UpdateCourse, COURSE_FIELDS, COURSE_RELATIONS};
use danza_db::repositories::course_repo::CourseEntity;
use danza_db::repositories::translatable::TranslationOpts;
use danza_db::repositories::{CourseDetail, CourseRepo, Translated};
use validator::Validate;

use crate::caching;
use crate::error::{AppError, AppResult};
use crate::query::{GetParams, ListParams};
use crate::response::DataResponse;
use crate::state::AppState;

const KEYS: CacheKeys = CacheKeys::new("course");

/// GET /api/v1/courses
///
/// Paginated course listing. Supports filter/sort on course columns and
/// `translation.*` fields, plus `lessons`/`venue` eager loads.
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&COURSE_FIELDS, COURSE_RELATIONS)?;

    let key = KEYS.paginated(&req);
    if let Some(page) = caching::lookup::<Page<CourseDetail>>(&state.cache, &key).await {
        return Ok(Json(page));
    }

    let page = CourseRepo::paginate(&state.pool, &req, &state.config.default_locale).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// GET /api/v1/courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<GetParams>,
) -> AppResult<impl IntoResponse> {
    let locale = params.locale()?;

    // Only the canonical all-translations view lives under the byId key;
    // locale-resolved views vary per request and skip the cache.
    let cacheable = locale.is_none() && params.include_all_translations;
    let key = KEYS.by_id(id);
    if cacheable {
        if let Some(hit) =
            caching::lookup::<Translated<CourseEntity>>(&state.cache, &key).await
        {
            return Ok(Json(DataResponse { data: hit }));
        }
    }

    let opts = TranslationOpts {
        locale: locale.as_ref(),
        include_all: params.include_all_translations,
        default_locale: &state.config.default_locale,
    };
    let course = CourseRepo::find_by_id(&state.pool, id, opts)
        .await?
        .ok_or(AppError::not_found("Course", id))?;

    if cacheable {
        caching::fill(&state.cache, &key, &course).await;
    }

    Ok(Json(DataResponse { data: course }))
}

/// POST /api/v1/courses
pub async fn create_course(
    State(state): State<AppState>,
    Json(input): Json<CreateCourse>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let course = CourseRepo::create(&state.pool, &input).await?;

    caching::invalidate(&state.cache, &[KEYS.all_paginated()]).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: course })))
}

/// PUT /api/v1/courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCourse>,
) -> AppResult<impl IntoResponse> {
    let course = CourseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Course", id))?;

    caching::invalidate(&state.cache, &[KEYS.by_id(id), KEYS.all_paginated()]).await?;
    tracing::info!(course_id = id, "Course updated");

    Ok(Json(DataResponse { data: course }))
}

/// DELETE /api/v1/courses/{id}
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = CourseRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Course", id));
    }

    caching::invalidate(&state.cache, &[KEYS.by_id(id), KEYS.all_paginated()]).await?;
    tracing::info!(course_id = id, "Course deleted");

    Ok(StatusCode::NO_CONTENT)
}
