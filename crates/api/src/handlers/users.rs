//! Handlers for user accounts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use danza_cache::CacheKeys;
use danza_core::query::pagination::Page;
use danza_core::types::DbId;
use danza_db::models::user::{CreateUser, UpdateUser, User, USER_FIELDS};
use danza_db::repositories::UserRepo;
use validator::Validate;

use crate::caching;
use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const KEYS: CacheKeys = CacheKeys::new("user");

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&USER_FIELDS, &[])?;

    let key = KEYS.paginated(&req);
    if let Some(page) = caching::lookup::<Page<User>>(&state.cache, &key).await {
        return Ok(Json(page));
    }

    let page = UserRepo::paginate(&state.pool, &req).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let key = KEYS.by_id(id);
    if let Some(hit) = caching::lookup::<User>(&state.cache, &key).await {
        return Ok(Json(DataResponse { data: hit }));
    }

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;
    caching::fill(&state.cache, &key, &user).await;

    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let user = UserRepo::create(&state.pool, &input).await?;

    caching::invalidate(&state.cache, &[KEYS.all_paginated()]).await?;
    tracing::info!(user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    caching::invalidate(&state.cache, &[KEYS.by_id(id), KEYS.all_paginated()]).await?;
    tracing::info!(user_id = id, "User updated");

    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/users/{id}
///
/// Enrollments and stored files cascade, so their user-scoped cache
/// entries are swept along with the user's own keys.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = UserRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("User", id));
    }

    caching::invalidate(
        &state.cache,
        &[
            KEYS.by_id(id),
            KEYS.all_paginated(),
            CacheKeys::new("enrollment").all_for_user(id),
            CacheKeys::new("payment").all_for_user(id),
            CacheKeys::new("file").all_for_user(id),
        ],
    )
    .await?;
    tracing::info!(user_id = id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
