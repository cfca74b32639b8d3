//! Route definitions for stored-file metadata.
//!
//! ```text
//! POST   /                  -> create_file
//! GET    /user/{user_id}    -> list_files_for_owner
//! GET    /{id}              -> get_file
//! DELETE /{id}              -> delete_file
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(files::create_file))
        .route("/user/{user_id}", get(files::list_files_for_owner))
        .route("/{id}", get(files::get_file).delete(files::delete_file))
}
