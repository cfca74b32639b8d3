//! Shared paginate helper for entities without translations.
//!
//! Keeps every list endpoint on the same request/envelope dialect as the
//! translatable facade: normalized filter/sort in, `Page<T>` out.

use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::sql;

/// Static description of a plain listing.
#[derive(Debug, Clone, Copy)]
pub struct ListSpec {
    pub table: &'static str,
    pub columns: &'static str,
    /// Extra equality scope, e.g. `("user_id", 7)` for per-user listings.
    pub scope: Option<(&'static str, DbId)>,
}

/// Run a filtered, sorted, paginated query and assemble the envelope.
pub async fn paginate_rows<R>(
    pool: &PgPool,
    spec: &ListSpec,
    req: &ListRequest,
) -> Result<Page<R>, sqlx::Error>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut count_query: QueryBuilder<'_, Postgres> =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", spec.table));
    sql::push_where(
        &mut count_query,
        spec.table,
        req.filter.as_ref(),
        None,
        None,
        spec.scope,
    );
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut data_query: QueryBuilder<'_, Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM {}", spec.columns, spec.table));
    sql::push_where(
        &mut data_query,
        spec.table,
        req.filter.as_ref(),
        None,
        None,
        spec.scope,
    );
    sql::push_order_by(&mut data_query, spec.table, req.sort.as_ref(), None, None);
    sql::push_page(&mut data_query, req.page.limit as i64, req.page.offset());
    let rows: Vec<R> = data_query.build_query_as().fetch_all(pool).await?;

    Ok(Page::new(rows, total, &req.page))
}
