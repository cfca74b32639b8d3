//! Route definitions for songs.
//!
//! ```text
//! GET    /          -> list_songs
//! POST   /          -> create_song
//! DELETE /{id}      -> delete_song
//! ```

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::songs;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(songs::list_songs).post(songs::create_song))
        .route("/{id}", delete(songs::delete_song))
}
