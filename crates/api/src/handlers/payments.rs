//! Handlers for payment records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use danza_cache::CacheKeys;
use danza_core::query::pagination::Page;
use danza_core::types::DbId;
use danza_db::models::payment::{
    CreatePayment, Payment, UpdatePaymentStatus, PAYMENT_FIELDS,
};
use danza_db::repositories::PaymentRepo;
use validator::Validate;

use crate::caching;
use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const KEYS: CacheKeys = CacheKeys::new("payment");

/// GET /api/v1/payments
pub async fn list_payments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&PAYMENT_FIELDS, &[])?;

    let key = KEYS.paginated(&req);
    if let Some(page) = caching::lookup::<Page<Payment>>(&state.cache, &key).await {
        return Ok(Json(page));
    }

    let page = PaymentRepo::paginate(&state.pool, &req).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// GET /api/v1/payments/user/{user_id}
pub async fn list_payments_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let req = params.normalize(&PAYMENT_FIELDS, &[])?;

    let key = KEYS.paginated_for_user(user_id, &req);
    if let Some(page) = caching::lookup::<Page<Payment>>(&state.cache, &key).await {
        return Ok(Json(page));
    }

    let page = PaymentRepo::paginate_for_user(&state.pool, user_id, &req).await?;
    caching::fill(&state.cache, &key, &page).await;

    Ok(Json(page))
}

/// GET /api/v1/payments/{id}
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let payment = PaymentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Payment", id))?;

    Ok(Json(DataResponse { data: payment }))
}

/// POST /api/v1/payments
pub async fn create_payment(
    State(state): State<AppState>,
    Json(input): Json<CreatePayment>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let payment = PaymentRepo::create(&state.pool, &input).await?;

    caching::invalidate(
        &state.cache,
        &[KEYS.all_paginated(), KEYS.all_for_user(payment.user_id)],
    )
    .await?;
    tracing::info!(
        payment_id = payment.id,
        user_id = payment.user_id,
        amount_cents = payment.amount_cents,
        "Payment recorded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: payment })))
}

/// PUT /api/v1/payments/{id}/status
///
/// Called by the provider-webhook use case after settlement.
pub async fn update_payment_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePaymentStatus>,
) -> AppResult<impl IntoResponse> {
    if !["pending", "succeeded", "refunded"].contains(&input.status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "invalid payment status `{}`",
            input.status
        )));
    }

    let payment = PaymentRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::not_found("Payment", id))?;

    caching::invalidate(
        &state.cache,
        &[
            KEYS.by_id(id),
            KEYS.all_paginated(),
            KEYS.all_for_user(payment.user_id),
        ],
    )
    .await?;
    tracing::info!(payment_id = id, status = %input.status, "Payment status updated");

    Ok(Json(DataResponse { data: payment }))
}
