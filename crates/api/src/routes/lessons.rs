//! Route definitions for lessons.
//!
//! ```text
//! GET    /          -> list_lessons
//! POST   /          -> create_lesson
//! GET    /{id}      -> get_lesson
//! PUT    /{id}      -> update_lesson
//! DELETE /{id}      -> delete_lesson
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::lessons;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lessons::list_lessons).post(lessons::create_lesson))
        .route(
            "/{id}",
            get(lessons::get_lesson)
                .put(lessons::update_lesson)
                .delete(lessons::delete_lesson),
        )
}
