//! Repository for the `users` table.

use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use sqlx::PgPool;

use super::paginate::{paginate_rows, ListSpec};
use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list for `users` queries.
const USER_COLUMNS: &str = "id, email, display_name, role, created_at, updated_at";

/// Provides CRUD operations for user accounts.
pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, display_name, role) \
             VALUES ($1, $2, COALESCE($3, 'student')) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(input.role.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as(&query).bind(id).fetch_optional(pool).await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                 display_name = COALESCE($2, display_name), \
                 role = COALESCE($3, role), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(id)
            .bind(input.display_name.as_deref())
            .bind(input.role.as_deref())
            .fetch_optional(pool)
            .await
    }

    pub async fn paginate(pool: &PgPool, req: &ListRequest) -> Result<Page<User>, sqlx::Error> {
        let spec = ListSpec {
            table: "users",
            columns: USER_COLUMNS,
            scope: None,
        };
        paginate_rows(pool, &spec, req).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
