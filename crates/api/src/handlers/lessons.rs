//! Handlers for lessons.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use danza_cache::CacheKeys;
use danza_core::query::pagination::Page;
use danza_core::types::DbId;
use danza_db::models::lesson::{CreateLesson, UpdateLesson, LESSON_FIELDS, LESSON_RELATIONS};
use danza_db::repositories::lesson_repo::LessonEntity;
use danza_db::repositories::translatable::TranslationOpts;
use danza_db::repositories::{LessonRepo, Translated};

use crate::caching;
use crate::error::{AppError, AppResult};
use crate::query::{GetParams, ListParams};
use crate::response::DataResponse;
use crate::state::AppState;

const KEYS: CacheKeys = CacheKeys::new("lesson");

/// Cached course listings can embed lessons via the `lessons` eager load,
/// so every lesson write also sweeps the course listing keys.
const COURSE_KEYS: CacheKeys = CacheKeys::new("course");

/// GET /api/v1/lessons
pub async fn list_lessons(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&LESSON_FIELDS, LESSON_RELATIONS)?;

    let key = KEYS.paginated(&req);
    if let Some(page) =
        caching::lookup::<Page<Translated<LessonEntity>>>(&state.cache, &key).await
    {
        return Ok(Json(page));
    }

    let page = LessonRepo::paginate(&state.pool, &req, &state.config.default_locale).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// GET /api/v1/lessons/{id}
pub async fn get_lesson(
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
    let lesson = LessonRepo::find_by_id(&state.pool, id, opts)
        .await?
        .ok_or(AppError::not_found("Lesson", id))?;

    Ok(Json(DataResponse { data: lesson }))
}

/// POST /api/v1/lessons
pub async fn create_lesson(
    State(state): State<AppState>,
    Json(input): Json<CreateLesson>,
) -> AppResult<impl IntoResponse> {
    let lesson = LessonRepo::create(&state.pool, &input).await?;

    caching::invalidate(
        &state.cache,
        &[KEYS.all_paginated(), COURSE_KEYS.all_paginated()],
    )
    .await?;
    tracing::info!(lesson_id = lesson.entity.id, course_id = lesson.entity.course_id, "Lesson created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: lesson })))
}

/// PUT /api/v1/lessons/{id}
pub async fn update_lesson(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLesson>,
) -> AppResult<impl IntoResponse> {
    let lesson = LessonRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Lesson", id))?;

    caching::invalidate(
        &state.cache,
        &[
            KEYS.by_id(id),
            KEYS.all_paginated(),
            COURSE_KEYS.all_paginated(),
        ],
    )
    .await?;
    tracing::info!(lesson_id = id, "Lesson updated");

    Ok(Json(DataResponse { data: lesson }))
}

/// DELETE /api/v1/lessons/{id}
pub async fn delete_lesson(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = LessonRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Lesson", id));
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
    tracing::info!(lesson_id = id, "Lesson deleted");

    Ok(StatusCode::NO_CONTENT)
}
