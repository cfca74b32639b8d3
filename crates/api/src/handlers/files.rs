//! Handlers for stored-file metadata.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use danza_cache::CacheKeys;
use danza_core::query::pagination::Page;
use danza_core::types::DbId;
use danza_db::models::stored_file::{CreateStoredFile, StoredFile, STORED_FILE_FIELDS};
use danza_db::repositories::FileRepo;
use validator::Validate;

use crate::caching;
use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const KEYS: CacheKeys = CacheKeys::new("file");

/// GET /api/v1/files/user/{user_id}
pub async fn list_files_for_owner(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&STORED_FILE_FIELDS, &[])?;

    let key = KEYS.paginated_for_user(user_id, &req);
    if let Some(page) = caching::lookup::<Page<StoredFile>>(&state.cache, &key).await {
        return Ok(Json(page));
    }

    let page = FileRepo::paginate_for_owner(&state.pool, user_id, &req).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// GET /api/v1/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let file = FileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("StoredFile", id))?;

    Ok(Json(DataResponse { data: file }))
}

/// POST /api/v1/files
///
/// Records metadata for an already-uploaded object.
pub async fn create_file(
    State(state): State<AppState>,
    Json(input): Json<CreateStoredFile>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let file = FileRepo::create(&state.pool, &input).await?;

    caching::invalidate(&state.cache, &[KEYS.all_for_user(file.owner_id)]).await?;
    tracing::info!(file_id = file.id, owner_id = file.owner_id, "File metadata recorded");

    Ok((StatusCode::CREATED, Json(DataResponse { data: file })))
}

/// DELETE /api/v1/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // Look the row up first so the owner-scoped keys can be swept.
    let file = FileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("StoredFile", id))?;

    let deleted = FileRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("StoredFile", id));
    }

    caching::invalidate(
        &state.cache,
        &[KEYS.by_id(id), KEYS.all_for_user(file.owner_id)],
    )
    .await?;
    tracing::info!(file_id = id, "File metadata deleted");

    Ok(StatusCode::NO_CONTENT)
}
