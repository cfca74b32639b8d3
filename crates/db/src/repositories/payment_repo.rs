//! Repository for the `payments` table.

use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use sqlx::PgPool;

use super::paginate::{paginate_rows, ListSpec};
use crate::models::payment::{CreatePayment, Payment};

/// Column list for `payments` queries.
const PAYMENT_COLUMNS: &str =
    "id, user_id, enrollment_id, amount_cents, currency, status, provider_ref, created_at";

/// Provides payment record operations. Settlement status is written by
/// the provider-webhook use case outside this service.
pub struct PaymentRepo;

impl PaymentRepo {
    pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments (user_id, enrollment_id, amount_cents, currency, provider_ref) \
             VALUES ($1, $2, $3, COALESCE($4, 'EUR'), $5) \
             RETURNING {PAYMENT_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(input.user_id)
            .bind(input.enrollment_id)
            .bind(input.amount_cents)
            .bind(input.currency.as_deref())
            .bind(input.provider_ref.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as(&query).bind(id).fetch_optional(pool).await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query =
            format!("UPDATE payments SET status = $2 WHERE id = $1 RETURNING {PAYMENT_COLUMNS}");
        sqlx::query_as(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// All payments, admin view.
    pub async fn paginate(pool: &PgPool, req: &ListRequest) -> Result<Page<Payment>, sqlx::Error> {
        let spec = ListSpec {
            table: "payments",
            columns: PAYMENT_COLUMNS,
            scope: None,
        };
        paginate_rows(pool, &spec, req).await
    }

    /// One user's payments.
    pub async fn paginate_for_user(
        pool: &PgPool,
        user_id: DbId,
        req: &ListRequest,
    ) -> Result<Page<Payment>, sqlx::Error> {
        let spec = ListSpec {
            table: "payments",
            columns: PAYMENT_COLUMNS,
            scope: Some(("user_id", user_id)),
        };
        paginate_rows(pool, &spec, req).await
    }
}
