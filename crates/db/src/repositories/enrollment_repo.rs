//! Repository for the `enrollments` table.

use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use sqlx::PgPool;

use super::paginate::{paginate_rows, ListSpec};
use crate::models::enrollment::{CreateEnrollment, Enrollment};

/// Column list for `enrollments` queries.
const ENROLLMENT_COLUMNS: &str = "id, user_id, course_id, status, enrolled_at";

/// Provides enrollment operations: joining a course, status transitions,
/// and per-user listings.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Enroll a user in a course. The `uq_enrollments_user_course`
    /// constraint rejects duplicates.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEnrollment,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (user_id, course_id) \
             VALUES ($1, $2) \
             RETURNING {ENROLLMENT_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(input.user_id)
            .bind(input.course_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as(&query).bind(id).fetch_optional(pool).await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "UPDATE enrollments SET status = $2 WHERE id = $1 RETURNING {ENROLLMENT_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// All enrollments, admin view.
    pub async fn paginate(
        pool: &PgPool,
        req: &ListRequest,
    ) -> Result<Page<Enrollment>, sqlx::Error> {
        let spec = ListSpec {
            table: "enrollments",
            columns: ENROLLMENT_COLUMNS,
            scope: None,
        };
        paginate_rows(pool, &spec, req).await
    }

    /// One user's enrollments.
    pub async fn paginate_for_user(
        pool: &PgPool,
        user_id: DbId,
        req: &ListRequest,
    ) -> Result<Page<Enrollment>, sqlx::Error> {
        let spec = ListSpec {
            table: "enrollments",
            columns: ENROLLMENT_COLUMNS,
            scope: Some(("user_id", user_id)),
        };
        paginate_rows(pool, &spec, req).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
