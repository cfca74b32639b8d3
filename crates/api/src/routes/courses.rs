//! Route definitions for courses.
//!
//! ```text
//! GET    /          -> list_courses
//! POST   /          -> create_course
//! GET    /{id}      -> get_course
//! PUT    /{id}      -> update_course
//! DELETE /{id}      -> delete_course
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::courses;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list_courses).post(courses::create_course))
        .route(
            "/{id}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
}
