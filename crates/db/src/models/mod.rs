//! Row structs, request DTOs, and per-entity field allow-lists.

pub mod album;
pub mod artist;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod payment;
pub mod song;
pub mod stored_file;
pub mod user;
pub mod venue;

use danza_core::types::DbId;

/// Implemented by every entity row so generic code can group and look up
/// rows by primary key.
pub trait Identified {
    fn id(&self) -> DbId;
}

/// Implemented by translation rows: which parent they belong to and which
/// locale they carry.
pub trait TranslationRecord {
    fn parent_id(&self) -> DbId;
    fn locale(&self) -> &str;
}

/// Localized fields supplied alongside a create/update, one per locale.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TranslationUpsert {
    pub locale: danza_core::locale::Locale,
    pub name: String,
    pub description: Option<String>,
}
