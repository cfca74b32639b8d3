//! User account models and DTOs.
//!
//! Account data only; authentication and session mechanics live outside
//! this service.

use danza_core::query::fields::{FieldSpec, FieldTable};
use danza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Identified;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identified for User {
    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub display_name: Option<String>,
    pub role: Option<String>,
}

pub static USER_FIELDS: FieldTable = FieldTable {
    entity: "User",
    columns: &[
        FieldSpec::int("id"),
        FieldSpec::text("email"),
        FieldSpec::text("display_name"),
        FieldSpec::text("role"),
        FieldSpec::datetime("created_at"),
    ],
    relations: &[],
};
