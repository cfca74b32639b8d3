//! Course models and DTOs.
//!
//! Courses are translatable: locale-specific name/description live in
//! `course_translations`, one row per (course, locale).

use danza_core::query::fields::{FieldSpec, FieldTable, RelationFields};
use danza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{Identified, TranslationRecord, TranslationUpsert};

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: DbId,
    pub slug: String,
    pub instructor_id: DbId,
    pub venue_id: Option<DbId>,
    pub dance_style: String,
    pub level: String,
    pub price_cents: i64,
    pub currency: String,
    pub is_published: bool,
    pub starts_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identified for Course {
    fn id(&self) -> DbId {
        self.id
    }
}

/// A row from the `course_translations` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CourseTranslation {
    pub id: DbId,
    pub course_id: DbId,
    pub locale: String,
    pub name: String,
    pub description: Option<String>,
}

impl TranslationRecord for CourseTranslation {
    fn parent_id(&self) -> DbId {
        self.course_id
    }

    fn locale(&self) -> &str {
        &self.locale
    }
}

/// DTO for creating a course. At least one translation is expected so the
/// course is presentable in some locale.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourse {
    #[validate(length(min = 1, max = 100))]
    pub slug: String,
    pub instructor_id: DbId,
    pub venue_id: Option<DbId>,
    pub dance_style: String,
    pub level: Option<String>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub starts_at: Option<Timestamp>,
    #[serde(default)]
    pub translations: Vec<TranslationUpsert>,
}

/// DTO for updating a course. Absent fields are left unchanged;
/// `translations` entries are upserted per locale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourse {
    pub venue_id: Option<DbId>,
    pub dance_style: Option<String>,
    pub level: Option<String>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub is_published: Option<bool>,
    pub starts_at: Option<Timestamp>,
    #[serde(default)]
    pub translations: Vec<TranslationUpsert>,
}

/// Filterable/sortable fields for course listings.
pub static COURSE_FIELDS: FieldTable = FieldTable {
    entity: "Course",
    columns: &[
        FieldSpec::int("id"),
        FieldSpec::text("slug"),
        FieldSpec::int("instructor_id"),
        FieldSpec::int("venue_id"),
        FieldSpec::text("dance_style"),
        FieldSpec::text("level"),
        FieldSpec::int("price_cents"),
        FieldSpec::text("currency"),
        FieldSpec::boolean("is_published"),
        FieldSpec::datetime("starts_at"),
        FieldSpec::datetime("created_at"),
    ],
    relations: &[RelationFields {
        relation: "translation",
        locale_aware: true,
        fields: &[FieldSpec::text("name"), FieldSpec::text("description")],
    }],
};

/// Relations courses can eager-load.
pub const COURSE_RELATIONS: &[&str] = &["lessons", "venue"];
