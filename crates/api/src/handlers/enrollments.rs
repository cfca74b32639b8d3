//! Handlers for enrollments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use danza_cache::CacheKeys;
use danza_core::query::pagination::Page;
use danza_core::types::DbId;
use danza_db::models::enrollment::{
    CreateEnrollment, Enrollment, UpdateEnrollmentStatus, ENROLLMENT_FIELDS,
};
use danza_db::repositories::EnrollmentRepo;

use crate::caching;
use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const KEYS: CacheKeys = CacheKeys::new("enrollment");

/// GET /api/v1/enrollments
pub async fn list_enrollments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&ENROLLMENT_FIELDS, &[])?;

    let key = KEYS.paginated(&req);
    if let Some(page) = caching::lookup::<Page<Enrollment>>(&state.cache, &key).await {
        return Ok(Json(page));
    }

    let page = EnrollmentRepo::paginate(&state.pool, &req).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// GET /api/v1/enrollments/user/{user_id}
pub async fn list_enrollments_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&ENROLLMENT_FIELDS, &[])?;

    let key = KEYS.paginated_for_user(user_id, &req);
    if let Some(page) = caching::lookup::<Page<Enrollment>>(&state.cache, &key).await {
        return Ok(Json(page));
    }

    let page = EnrollmentRepo::paginate_for_user(&state.pool, user_id, &req).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// POST /api/v1/enrollments
pub async fn create_enrollment(
    State(state): State<AppState>,
    Json(input): Json<CreateEnrollment>,
) -> AppResult<impl IntoResponse> {
    let enrollment = EnrollmentRepo::create(&state.pool, &input).await?;

    caching::invalidate(
        &state.cache,
        &[
            KEYS.all_paginated(),
            KEYS.all_for_user(enrollment.user_id),
        ],
    )
    .await?;
    tracing::info!(
        enrollment_id = enrollment.id,
        user_id = enrollment.user_id,
        course_id = enrollment.course_id,
        "Enrollment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: enrollment })))
}

/// PUT /api/v1/enrollments/{id}/status
pub async fn update_enrollment_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEnrollmentStatus>,
) -> AppResult<impl IntoResponse> {
    if !["active", "completed", "cancelled"].contains(&input.status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "invalid enrollment status `{}`",
            input.status
        )));
    }

    let enrollment = EnrollmentRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::not_found("Enrollment", id))?;

    caching::invalidate(
        &state.cache,
        &[
            KEYS.by_id(id),
            KEYS.all_paginated(),
            KEYS.all_for_user(enrollment.user_id),
        ],
    )
    .await?;
    tracing::info!(enrollment_id = id, status = %input.status, "Enrollment status updated");

    Ok(Json(DataResponse { data: enrollment }))
}

/// DELETE /api/v1/enrollments/{id}
pub async fn delete_enrollment(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // Look the row up first so the user-scoped keys can be swept.
    let enrollment = EnrollmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Enrollment", id))?;

    let deleted = EnrollmentRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Enrollment", id));
    }

    caching::invalidate(
        &state.cache,
        &[
            KEYS.by_id(id),
            KEYS.all_paginated(),
            KEYS.all_for_user(enrollment.user_id),
        ],
    )
    .await?;
    tracing::info!(enrollment_id = id, "Enrollment deleted");

    Ok(StatusCode::NO_CONTENT)
}
