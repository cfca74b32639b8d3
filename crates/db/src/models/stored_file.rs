//! Stored-file metadata. The bytes live in object storage under
//! `storage_key`; transport is out of scope for this service.

use danza_core::query::fields::{FieldSpec, FieldTable};
use danza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Identified;

/// A row from the `stored_files` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: DbId,
    pub owner_id: DbId,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub created_at: Timestamp,
}

impl Identified for StoredFile {
    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStoredFile {
    pub owner_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(min = 1, max = 100))]
    pub content_type: String,
    #[validate(range(min = 0))]
    pub size_bytes: i64,
    #[validate(length(min = 1, max = 512))]
    pub storage_key: String,
}

pub static STORED_FILE_FIELDS: FieldTable = FieldTable {
    entity: "StoredFile",
    columns: &[
        FieldSpec::int("id"),
        FieldSpec::int("owner_id"),
        FieldSpec::text("file_name"),
        FieldSpec::text("content_type"),
        FieldSpec::int("size_bytes"),
        FieldSpec::datetime("created_at"),
    ],
    relations: &[],
};
