//! Enrollment models and DTOs: the user <-> course membership record.

use danza_core::query::fields::{FieldSpec, FieldTable};
use danza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Identified;

/// A row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub status: String,
    pub enrolled_at: Timestamp,
}

impl Identified for Enrollment {
    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnrollment {
    pub user_id: DbId,
    pub course_id: DbId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEnrollmentStatus {
    pub status: String,
}

pub static ENROLLMENT_FIELDS: FieldTable = FieldTable {
    entity: "Enrollment",
    columns: &[
        FieldSpec::int("id"),
        FieldSpec::int("user_id"),
        FieldSpec::int("course_id"),
        FieldSpec::text("status"),
        FieldSpec::datetime("enrolled_at"),
    ],
    relations: &[],
};
