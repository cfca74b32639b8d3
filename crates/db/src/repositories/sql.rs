//! Translation of normalized filter/sort expressions into SQL.
//!
//! Everything here appends to a [`QueryBuilder`] so user values are always
//! bound parameters; only column/table names from the static field tables
//! are interpolated into the SQL text.

use danza_core::locale::Locale;
use danza_core::query::fields::FieldTarget;
use danza_core::query::filter::{
    FilterOperator, FilterValue, NormalizedFilter, NormalizedSort, ScalarValue,
};
use danza_core::types::DbId;
use sqlx::{Postgres, QueryBuilder};

use super::translatable::TranslationJoin;

/// Append the WHERE clause for an optional row scope (e.g. `user_id = $1`
/// for per-user listings) plus the normalized filter.
pub(crate) fn push_where(
    qb: &mut QueryBuilder<'_, Postgres>,
    table: &'static str,
    filter: Option<&NormalizedFilter>,
    translation: Option<&TranslationJoin>,
    locale: Option<&Locale>,
    scope: Option<(&'static str, DbId)>,
) {
    let mut first = true;
    if let Some((column, id)) = scope {
        qb.push(" WHERE ");
        qb.push(column);
        qb.push(" = ");
        qb.push_bind(id);
        first = false;
    }
    if let Some(filter) = filter {
        qb.push(if first { " WHERE " } else { " AND " });
        push_filter(qb, table, filter, translation, locale);
    }
}

/// Append one normalized filter predicate.
///
/// Local columns compare directly. Translation fields become an `EXISTS`
/// subquery against the translation table: constrained to the request
/// locale when one was given, matched across all locales otherwise.
fn push_filter(
    qb: &mut QueryBuilder<'_, Postgres>,
    table: &'static str,
    filter: &NormalizedFilter,
    translation: Option<&TranslationJoin>,
    locale: Option<&Locale>,
) {
    match filter.target {
        FieldTarget::Column(column) => push_predicate(qb, column, filter),
        FieldTarget::Related { column, .. } => {
            let Some(join) = translation else {
                // Field tables without a translation relation never
                // resolve a related target; keep the query well-formed.
                qb.push("FALSE");
                return;
            };
            qb.push("EXISTS (SELECT 1 FROM ");
            qb.push(join.table);
            qb.push(" tr WHERE tr.");
            qb.push(join.fk);
            qb.push(" = ");
            qb.push(table);
            qb.push(".id");
            if let Some(locale) = locale {
                qb.push(" AND tr.locale = ");
                qb.push_bind(locale.as_str().to_owned());
            }
            qb.push(" AND ");
            push_predicate(qb, &format!("tr.{column}"), filter);
            qb.push(")");
        }
    }
}

/// Append the ORDER BY clause. `id` is always the final sort key so
/// pagination is stable across requests.
///
/// Translation-field sorts order by a scalar subquery pinned to
/// `sort_locale` (the request locale, or the configured default when the
/// request has none) so the result never depends on store row order.
pub(crate) fn push_order_by(
    qb: &mut QueryBuilder<'_, Postgres>,
    table: &'static str,
    sort: Option<&NormalizedSort>,
    translation: Option<&TranslationJoin>,
    sort_locale: Option<&Locale>,
) {
    match sort.map(|s| (s, s.target)) {
        Some((s, FieldTarget::Column(column))) => {
            qb.push(" ORDER BY ");
            qb.push(column);
            qb.push(" ");
            qb.push(s.order.as_sql());
            qb.push(", id ASC");
        }
        Some((s, FieldTarget::Related { column, .. })) => {
            let (Some(join), Some(locale)) = (translation, sort_locale) else {
                qb.push(" ORDER BY id ASC");
                return;
            };
            qb.push(" ORDER BY (SELECT tr.");
            qb.push(column);
            qb.push(" FROM ");
            qb.push(join.table);
            qb.push(" tr WHERE tr.");
            qb.push(join.fk);
            qb.push(" = ");
            qb.push(table);
            qb.push(".id AND tr.locale = ");
            qb.push_bind(locale.as_str().to_owned());
            qb.push(" LIMIT 1) ");
            qb.push(s.order.as_sql());
            qb.push(", id ASC");
        }
        None => {
            qb.push(" ORDER BY id ASC");
        }
    }
}

/// Append `LIMIT`/`OFFSET` bindings.
pub(crate) fn push_page(qb: &mut QueryBuilder<'_, Postgres>, limit: i64, offset: i64) {
    qb.push(" LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
}

/// Append `<column> <op> <bound value>` for one predicate.
fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, column: &str, filter: &NormalizedFilter) {
    match (filter.operator, &filter.value) {
        (FilterOperator::Eq, FilterValue::Scalar(ScalarValue::Null)) => {
            qb.push(column);
            qb.push(" IS NULL");
        }
        (FilterOperator::Ne, FilterValue::Scalar(ScalarValue::Null)) => {
            qb.push(column);
            qb.push(" IS NOT NULL");
        }
        (FilterOperator::In, FilterValue::List(items)) => {
            qb.push(column);
            qb.push(" = ANY(");
            push_scalar_list(qb, items);
            qb.push(")");
        }
        (op, FilterValue::Scalar(value)) => {
            qb.push(column);
            qb.push(sql_comparator(op));
            push_scalar(qb, value);
        }
        // The normalizer pairs `in` with lists and every other operator
        // with scalars; nothing else reaches SQL construction.
        _ => {
            qb.push("FALSE");
        }
    }
}

fn sql_comparator(op: FilterOperator) -> &'static str {
    match op {
        FilterOperator::Eq | FilterOperator::In => " = ",
        FilterOperator::Ne => " <> ",
        FilterOperator::Like => " LIKE ",
        FilterOperator::ILike => " ILIKE ",
        FilterOperator::Gt => " > ",
        FilterOperator::Gte => " >= ",
        FilterOperator::Lt => " < ",
        FilterOperator::Lte => " <= ",
    }
}

fn push_scalar(qb: &mut QueryBuilder<'_, Postgres>, value: &ScalarValue) {
    match value {
        ScalarValue::Text(v) => qb.push_bind(v.clone()),
        ScalarValue::Int(v) => qb.push_bind(*v),
        ScalarValue::Float(v) => qb.push_bind(*v),
        ScalarValue::Bool(v) => qb.push_bind(*v),
        ScalarValue::Uuid(v) => qb.push_bind(*v),
        ScalarValue::DateTime(v) => qb.push_bind(*v),
        // Null comparisons are rewritten to IS [NOT] NULL above.
        ScalarValue::Null => qb.push("NULL"),
    };
}

/// Bind a homogeneous scalar list as a Postgres array.
fn push_scalar_list(qb: &mut QueryBuilder<'_, Postgres>, items: &[ScalarValue]) {
    match items.first() {
        Some(ScalarValue::Int(_)) => {
            let values: Vec<i64> = items
                .iter()
                .filter_map(|item| match item {
                    ScalarValue::Int(v) => Some(*v),
                    _ => None,
                })
                .collect();
            qb.push_bind(values);
        }
        Some(ScalarValue::Float(_)) => {
            let values: Vec<f64> = items
                .iter()
                .filter_map(|item| match item {
                    ScalarValue::Float(v) => Some(*v),
                    _ => None,
                })
                .collect();
            qb.push_bind(values);
        }
        Some(ScalarValue::Uuid(_)) => {
            let values: Vec<uuid::Uuid> = items
                .iter()
                .filter_map(|item| match item {
                    ScalarValue::Uuid(v) => Some(*v),
                    _ => None,
                })
                .collect();
            qb.push_bind(values);
        }
        Some(ScalarValue::DateTime(_)) => {
            let values: Vec<danza_core::types::Timestamp> = items
                .iter()
                .filter_map(|item| match item {
                    ScalarValue::DateTime(v) => Some(*v),
                    _ => None,
                })
                .collect();
            qb.push_bind(values);
        }
        _ => {
            let values: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    ScalarValue::Text(v) => Some(v.clone()),
                    _ => None,
                })
                .collect();
            qb.push_bind(values);
        }
    };
}

#[cfg(test)]
mod tests {
    use danza_core::query::fields::{FieldSpec, FieldTable, RelationFields};
    use danza_core::query::filter::{normalize_filter, normalize_sort, FilterInput, SortInput};

    use super::*;

    static TABLE: FieldTable = FieldTable {
        entity: "Course",
        columns: &[FieldSpec::int("price_cents"), FieldSpec::text("slug")],
        relations: &[RelationFields {
            relation: "translation",
            locale_aware: true,
            fields: &[FieldSpec::text("name")],
        }],
    };

    const JOIN: TranslationJoin = TranslationJoin {
        table: "course_translations",
        fk: "course_id",
    };

    fn filter(raw: &str) -> NormalizedFilter {
        normalize_filter(&FilterInput::decode(raw), &TABLE).unwrap()
    }

    #[test]
    fn local_column_predicate() {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM courses");
        let f = filter(r#"{"field":"price_cents","operator":"gte","value":1000}"#);
        push_where(&mut qb, "courses", Some(&f), Some(&JOIN), None, None);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM courses WHERE price_cents >= $1"
        );
    }

    #[test]
    fn translation_predicate_with_locale() {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM courses");
        let f = filter(r#"{"field":"translation.name","operator":"ilike","value":"%salsa%"}"#);
        let locale: Locale = "de".parse().unwrap();
        push_where(&mut qb, "courses", Some(&f), Some(&JOIN), Some(&locale), None);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM courses WHERE EXISTS (SELECT 1 FROM course_translations tr \
             WHERE tr.course_id = courses.id AND tr.locale = $1 AND tr.name ILIKE $2)"
        );
    }

    #[test]
    fn translation_predicate_without_locale_matches_any() {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM courses");
        let f = filter(r#"{"field":"translation.name","operator":"eq","value":"Tango"}"#);
        push_where(&mut qb, "courses", Some(&f), Some(&JOIN), None, None);
        assert!(!qb.sql().contains("tr.locale"));
    }

    #[test]
    fn scope_combines_with_filter() {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM payments");
        let f = filter(r#"{"field":"slug","operator":"eq","value":"x"}"#);
        push_where(&mut qb, "payments", Some(&f), None, None, Some(("user_id", 7)));
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM payments WHERE user_id = $1 AND slug = $2"
        );
    }

    #[test]
    fn null_equality_becomes_is_null() {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM courses");
        let f = filter(r#"{"field":"slug","operator":"eq","value":null}"#);
        push_where(&mut qb, "courses", Some(&f), None, None, None);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM courses WHERE slug IS NULL");
    }

    #[test]
    fn in_list_binds_an_array() {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM courses");
        let f = filter(r#"{"field":"slug","operator":"in","value":["a","b"]}"#);
        push_where(&mut qb, "courses", Some(&f), None, None, None);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM courses WHERE slug = ANY($1)"
        );
    }

    #[test]
    fn order_by_local_column_with_stable_tiebreak() {
        let mut qb = QueryBuilder::new("SELECT * FROM courses");
        let s =
            normalize_sort(&SortInput::decode(r#"{"field":"slug","order":"desc"}"#), &TABLE)
                .unwrap();
        push_order_by(&mut qb, "courses", Some(&s), Some(&JOIN), None);
        assert_eq!(qb.sql(), "SELECT * FROM courses ORDER BY slug DESC, id ASC");
    }

    #[test]
    fn order_by_translation_uses_locale_pinned_subquery() {
        let mut qb = QueryBuilder::new("SELECT * FROM courses");
        let s = normalize_sort(
            &SortInput::decode(r#"{"field":"translation.name","order":"asc"}"#),
            &TABLE,
        )
        .unwrap();
        let locale: Locale = "en".parse().unwrap();
        push_order_by(&mut qb, "courses", Some(&s), Some(&JOIN), Some(&locale));
        assert_eq!(
            qb.sql(),
            "SELECT * FROM courses ORDER BY (SELECT tr.name FROM course_translations tr \
             WHERE tr.course_id = courses.id AND tr.locale = $1 LIMIT 1) ASC, id ASC"
        );
    }

    #[test]
    fn default_order_is_by_id() {
        let mut qb = QueryBuilder::new("SELECT * FROM courses");
        push_order_by(&mut qb, "courses", None, None, None);
        assert_eq!(qb.sql(), "SELECT * FROM courses ORDER BY id ASC");
    }
}
