//! Request handlers, one module per entity domain.
//!
//! Every list handler follows the same pipeline: normalize the request
//! against the entity's field table, consult the cache, fall through to
//! the repository, fill the cache, return the envelope. Write handlers
//! invalidate the affected keys before responding.

pub mod albums;
pub mod artists;
pub mod courses;
pub mod enrollments;
pub mod files;
pub mod lessons;
pub mod payments;
pub mod songs;
pub mod users;
pub mod venues;
