//! Song models and DTOs. `bpm` is recorded so instructors can match
//! material to a class tempo.

use danza_core::query::fields::{FieldSpec, FieldTable};
use danza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Identified;

/// A row from the `songs` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Song {
    pub id: DbId,
    pub album_id: DbId,
    pub title: String,
    pub duration_secs: i32,
    pub bpm: Option<i32>,
    pub created_at: Timestamp,
}

impl Identified for Song {
    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSong {
    pub album_id: DbId,
    pub title: String,
    pub duration_secs: Option<i32>,
    pub bpm: Option<i32>,
}

pub static SONG_FIELDS: FieldTable = FieldTable {
    entity: "Song",
    columns: &[
        FieldSpec::int("id"),
        FieldSpec::int("album_id"),
        FieldSpec::text("title"),
        FieldSpec::int("duration_secs"),
        FieldSpec::int("bpm"),
    ],
    relations: &[],
};
