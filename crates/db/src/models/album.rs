//! Album models and DTOs.

use chrono::NaiveDate;
use danza_core::query::fields::{FieldSpec, FieldTable};
use danza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Identified;

/// A row from the `albums` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Album {
    pub id: DbId,
    pub artist_id: DbId,
    pub title: String,
    pub released_on: Option<NaiveDate>,
    pub created_at: Timestamp,
}

impl Identified for Album {
    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlbum {
    pub artist_id: DbId,
    pub title: String,
    pub released_on: Option<NaiveDate>,
}

pub static ALBUM_FIELDS: FieldTable = FieldTable {
    entity: "Album",
    columns: &[
        FieldSpec::int("id"),
        FieldSpec::int("artist_id"),
        FieldSpec::text("title"),
    ],
    relations: &[],
};
