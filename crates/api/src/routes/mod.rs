//! Route definitions.

pub mod albums;
pub mod artists;
pub mod courses;
pub mod enrollments;
pub mod files;
pub mod health;
pub mod lessons;
pub mod payments;
pub mod songs;
pub mod users;
pub mod venues;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /users                          list, create
/// /users/{id}                     get, update, delete
/// /venues                         list, create
/// /venues/{id}                    get, update, delete
/// /courses                        list, create
/// /courses/{id}                   get, update, delete
/// /lessons                        list, create
/// /lessons/{id}                   get, update, delete
/// /artists                        list, create
/// /artists/{id}                   get, update, delete
/// /albums                         list, create
/// /albums/{id}                    delete
/// /songs                          list, create
/// /songs/{id}                     delete
/// /enrollments                    list, create
/// /enrollments/user/{user_id}     per-user listing
/// /enrollments/{id}/status        update status
/// /enrollments/{id}               delete
/// /payments                       list, create
/// /payments/user/{user_id}        per-user listing
/// /payments/{id}                  get
/// /payments/{id}/status           update status
/// /files                          create
/// /files/user/{user_id}           per-user listing
/// /files/{id}                     get, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/venues", venues::router())
        .nest("/courses", courses::router())
        .nest("/lessons", lessons::router())
        .nest("/artists", artists::router())
        .nest("/albums", albums::router())
        .nest("/songs", songs::router())
        .nest("/enrollments", enrollments::router())
        .nest("/payments", payments::router())
        .nest("/files", files::router())
}
