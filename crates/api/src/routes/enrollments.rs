//! Route definitions for enrollments.
//!
//! ```text
//! GET    /                  -> list_enrollments
//! POST   /                  -> create_enrollment
//! GET    /user/{user_id}    -> list_enrollments_for_user
//! PUT    /{id}/status       -> update_enrollment_status
//! DELETE /{id}              -> delete_enrollment
//! ```

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::enrollments;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(enrollments::list_enrollments).post(enrollments::create_enrollment),
        )
        .route("/user/{user_id}", get(enrollments::list_enrollments_for_user))
        .route("/{id}/status", put(enrollments::update_enrollment_status))
        .route("/{id}", delete(enrollments::delete_enrollment))
}
