//! Venue models and DTOs. Venues are translatable (name, description).

use danza_core::query::fields::{FieldSpec, FieldTable, RelationFields};
use danza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{Identified, TranslationRecord, TranslationUpsert};

/// A row from the `venues` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Venue {
    pub id: DbId,
    pub slug: String,
    pub address: String,
    pub city: String,
    pub capacity: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identified for Venue {
    fn id(&self) -> DbId {
        self.id
    }
}

/// A row from the `venue_translations` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VenueTranslation {
    pub id: DbId,
    pub venue_id: DbId,
    pub locale: String,
    pub name: String,
    pub description: Option<String>,
}

impl TranslationRecord for VenueTranslation {
    fn parent_id(&self) -> DbId {
        self.venue_id
    }

    fn locale(&self) -> &str {
        &self.locale
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVenue {
    #[validate(length(min = 1, max = 100))]
    pub slug: String,
    #[validate(length(min = 1, max = 200))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    pub capacity: Option<i32>,
    #[serde(default)]
    pub translations: Vec<TranslationUpsert>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVenue {
    pub address: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<i32>,
    #[serde(default)]
    pub translations: Vec<TranslationUpsert>,
}

pub static VENUE_FIELDS: FieldTable = FieldTable {
    entity: "Venue",
    columns: &[
        FieldSpec::int("id"),
        FieldSpec::text("slug"),
        FieldSpec::text("city"),
        FieldSpec::int("capacity"),
    ],
    relations: &[RelationFields {
        relation: "translation",
        locale_aware: true,
        fields: &[FieldSpec::text("name"), FieldSpec::text("description")],
    }],
};

pub const VENUE_RELATIONS: &[&str] = &[];
