//! Lesson models and DTOs. Lessons belong to a course and are
//! translatable like their parent.

use danza_core::query::fields::{FieldSpec, FieldTable, RelationFields};
use danza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Identified, TranslationRecord, TranslationUpsert};

/// A row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lesson {
    pub id: DbId,
    pub course_id: DbId,
    pub position: i32,
    pub starts_at: Option<Timestamp>,
    pub duration_mins: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identified for Lesson {
    fn id(&self) -> DbId {
        self.id
    }
}

/// A row from the `lesson_translations` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LessonTranslation {
    pub id: DbId,
    pub lesson_id: DbId,
    pub locale: String,
    pub name: String,
    pub description: Option<String>,
}

impl TranslationRecord for LessonTranslation {
    fn parent_id(&self) -> DbId {
        self.lesson_id
    }

    fn locale(&self) -> &str {
        &self.locale
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLesson {
    pub course_id: DbId,
    pub position: Option<i32>,
    pub starts_at: Option<Timestamp>,
    pub duration_mins: Option<i32>,
    #[serde(default)]
    pub translations: Vec<TranslationUpsert>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLesson {
    pub position: Option<i32>,
    pub starts_at: Option<Timestamp>,
    pub duration_mins: Option<i32>,
    #[serde(default)]
    pub translations: Vec<TranslationUpsert>,
}

pub static LESSON_FIELDS: FieldTable = FieldTable {
    entity: "Lesson",
    columns: &[
        FieldSpec::int("id"),
        FieldSpec::int("course_id"),
        FieldSpec::int("position"),
        FieldSpec::datetime("starts_at"),
        FieldSpec::int("duration_mins"),
    ],
    relations: &[RelationFields {
        relation: "translation",
        locale_aware: true,
        fields: &[FieldSpec::text("name"), FieldSpec::text("description")],
    }],
};

pub const LESSON_RELATIONS: &[&str] = &[];
