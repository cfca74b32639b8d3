//! Route definitions for venues.
//!
//! ```text
//! GET    /          -> list_venues
//! POST   /          -> create_venue
//! GET    /{id}      -> get_venue
//! PUT    /{id}      -> update_venue
//! DELETE /{id}      -> delete_venue
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::venues;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(venues::list_venues).post(venues::create_venue))
        .route(
            "/{id}",
            get(venues::get_venue)
                .put(venues::update_venue)
                .delete(venues::delete_venue),
        )
}
