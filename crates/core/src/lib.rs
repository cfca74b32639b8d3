//! Domain-independent core for the danza backend.
//!
//! This crate holds the query layer that every list endpoint is built on:
//! pagination types, the filter/sort normalizer, per-entity field tables,
//! the relation-path parser, and the shared error/locale/id types. It has
//! no database or HTTP dependencies so it can be used from the repository
//! layer, the API layer, and any future CLI tooling alike.

pub mod error;
pub mod locale;
pub mod query;
pub mod types;
