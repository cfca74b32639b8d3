//! Shared response envelope types for API handlers.
//!
//! Single-entity responses use a `{ "data": ... }` envelope; paginated
//! listings return the `Page` envelope from `danza_core` directly, since
//! its seven-field shape is a wire contract of its own.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope for non-paginated payloads.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
