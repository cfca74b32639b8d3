//! Payment records. Provider integration happens elsewhere; this table
//! only tracks what was charged and its settlement status.

use danza_core::query::fields::{FieldSpec, FieldTable};
use danza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Identified;

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: DbId,
    pub user_id: DbId,
    pub enrollment_id: Option<DbId>,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub provider_ref: Option<String>,
    pub created_at: Timestamp,
}

impl Identified for Payment {
    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePayment {
    pub user_id: DbId,
    pub enrollment_id: Option<DbId>,
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    pub currency: Option<String>,
    pub provider_ref: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentStatus {
    pub status: String,
}

pub static PAYMENT_FIELDS: FieldTable = FieldTable {
    entity: "Payment",
    columns: &[
        FieldSpec::int("id"),
        FieldSpec::int("user_id"),
        FieldSpec::int("enrollment_id"),
        FieldSpec::int("amount_cents"),
        FieldSpec::text("currency"),
        FieldSpec::text("status"),
        FieldSpec::datetime("created_at"),
    ],
    relations: &[],
};
