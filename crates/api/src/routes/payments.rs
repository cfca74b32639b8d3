//! Route definitions for payments.
//!
//! ```text
//! GET    /                  -> list_payments
//! POST   /                  -> create_payment
//! GET    /user/{user_id}    -> list_payments_for_user
//! GET    /{id}              -> get_payment
//! PUT    /{id}/status       -> update_payment_status
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(payments::list_payments).post(payments::create_payment),
        )
        .route("/user/{user_id}", get(payments::list_payments_for_user))
        .route("/{id}", get(payments::get_payment))
        .route("/{id}/status", put(payments::update_payment_status))
}
