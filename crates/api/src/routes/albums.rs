//! Route definitions for albums.
//!
//! ```text
//! GET    /          -> list_albums
//! POST   /          -> create_album
//! DELETE /{id}      -> delete_album
//! ```

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::albums;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(albums::list_albums).post(albums::create_album))
        .route("/{id}", delete(albums::delete_album))
}
