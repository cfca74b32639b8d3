//! Artist models and DTOs.
//!
//! The music catalog (artists -> albums -> songs) backs class playlists;
//! artists are the usual demonstration case for nested eager loading
//! (`albums`, `albums.songs`).

use danza_core::query::fields::{FieldSpec, FieldTable};
use danza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Identified;

/// A row from the `artists` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Artist {
    pub id: DbId,
    pub name: String,
    pub country: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identified for Artist {
    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateArtist {
    pub name: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArtist {
    pub name: Option<String>,
    pub country: Option<String>,
}

pub static ARTIST_FIELDS: FieldTable = FieldTable {
    entity: "Artist",
    columns: &[
        FieldSpec::int("id"),
        FieldSpec::text("name"),
        FieldSpec::text("country"),
        FieldSpec::datetime("created_at"),
    ],
    relations: &[],
};

pub const ARTIST_RELATIONS: &[&str] = &["albums"];
