//! The translatable repository facade.
//!
//! Entities with locale-specific child records (courses, lessons, venues)
//! implement [`TranslatableEntity`] and get uniform `find_by_id` /
//! `paginate` / `delete` operations: translation-aware filtering and
//! sorting, locale fallback on reads, and the standard pagination
//! envelope.

use std::collections::HashMap;

use danza_core::locale::Locale;
use danza_core::query::fields::FieldTable;
use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::sql;
use crate::models::{Identified, TranslationRecord};

/// Where an entity's translations live.
#[derive(Debug, Clone, Copy)]
pub struct TranslationJoin {
    pub table: &'static str,
    pub fk: &'static str,
}

/// Static description of a translatable entity.
pub trait TranslatableEntity {
    /// Entity name for error messages ("Course").
    const ENTITY: &'static str;
    const TABLE: &'static str;
    const COLUMNS: &'static str;
    const TRANSLATION: TranslationJoin;
    const TRANSLATION_COLUMNS: &'static str;

    type Row: for<'r> FromRow<'r, PgRow>
        + Identified
        + Serialize
        + DeserializeOwned
        + Clone
        + Send
        + Unpin;
    type TranslationRow: for<'r> FromRow<'r, PgRow>
        + TranslationRecord
        + Serialize
        + DeserializeOwned
        + Clone
        + Send
        + Unpin;

    fn fields() -> &'static FieldTable;
}

/// An entity row with its translation(s) attached.
///
/// Exactly one of `translation` / `translations` is populated: the single
/// resolved row for locale-scoped reads, or every row keyed by locale
/// when all translations were requested.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "E: TranslatableEntity",
    deserialize = "E: TranslatableEntity"
))]
pub struct Translated<E: TranslatableEntity> {
    #[serde(flatten)]
    pub entity: E::Row,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<E::TranslationRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<E::TranslationRow>>,
}

// Manual impls: the derives would put a bound on the marker type `E`
// itself rather than on its row types.
impl<E: TranslatableEntity> Clone for Translated<E> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity.clone(),
            translation: self.translation.clone(),
            translations: self.translations.clone(),
        }
    }
}

impl<E: TranslatableEntity> std::fmt::Debug for Translated<E>
where
    E::Row: std::fmt::Debug,
    E::TranslationRow: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translated")
            .field("entity", &self.entity)
            .field("translation", &self.translation)
            .field("translations", &self.translations)
            .finish()
    }
}

/// Translation-selection parameters shared by read operations.
#[derive(Debug, Clone, Copy)]
pub struct TranslationOpts<'a> {
    pub locale: Option<&'a Locale>,
    pub include_all: bool,
    pub default_locale: &'a Locale,
}

/// Fetch one entity with its translation(s). `None` if no row matches.
pub async fn find_by_id<E: TranslatableEntity>(
    pool: &PgPool,
    id: DbId,
    opts: TranslationOpts<'_>,
) -> Result<Option<Translated<E>>, sqlx::Error> {
    let query = format!("SELECT {} FROM {} WHERE id = $1", E::COLUMNS, E::TABLE);
    let row: Option<E::Row> = sqlx::query_as(&query).bind(id).fetch_optional(pool).await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut items = attach_translations::<E>(pool, vec![row], opts).await?;
    Ok(items.pop())
}

/// Run a translation-aware paginated listing.
///
/// Filter/sort expressions targeting the `translation` relation join the
/// translation table: filters as `EXISTS` subqueries (locale-constrained
/// when the request has a locale, any-locale otherwise), sorts via a
/// scalar subquery pinned to the request locale or the configured
/// default.
pub async fn paginate<E: TranslatableEntity>(
    pool: &PgPool,
    req: &ListRequest,
    default_locale: &Locale,
) -> Result<Page<Translated<E>>, sqlx::Error> {
    let join = E::TRANSLATION;

    let mut count_query: QueryBuilder<'_, Postgres> =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", E::TABLE));
    sql::push_where(
        &mut count_query,
        E::TABLE,
        req.filter.as_ref(),
        Some(&join),
        req.locale.as_ref(),
        None,
    );
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut data_query: QueryBuilder<'_, Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM {}", E::COLUMNS, E::TABLE));
    sql::push_where(
        &mut data_query,
        E::TABLE,
        req.filter.as_ref(),
        Some(&join),
        req.locale.as_ref(),
        None,
    );
    let sort_locale = req.locale.as_ref().unwrap_or(default_locale);
    sql::push_order_by(
        &mut data_query,
        E::TABLE,
        req.sort.as_ref(),
        Some(&join),
        Some(sort_locale),
    );
    sql::push_page(&mut data_query, req.page.limit as i64, req.page.offset());
    let rows: Vec<E::Row> = data_query.build_query_as().fetch_all(pool).await?;

    let opts = TranslationOpts {
        locale: req.locale.as_ref(),
        include_all: req.include_all_translations,
        default_locale,
    };
    let items = attach_translations::<E>(pool, rows, opts).await?;
    Ok(Page::new(items, total, &req.page))
}

/// Delete one entity row. Translations cascade via the schema.
/// Returns whether a row was actually removed.
pub async fn delete<E: TranslatableEntity>(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
    let query = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
    let result = sqlx::query(&query).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Batch-load translations for a set of entity rows and resolve which
/// row(s) each entity carries.
///
/// Locale fallback is a single hop: requested locale, then the configured
/// default, then none. When `include_all` is set every translation row is
/// attached instead.
pub async fn attach_translations<E: TranslatableEntity>(
    pool: &PgPool,
    rows: Vec<E::Row>,
    opts: TranslationOpts<'_>,
) -> Result<Vec<Translated<E>>, sqlx::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<DbId> = rows.iter().map(Identified::id).collect();
    let join = E::TRANSLATION;

    let translations: Vec<E::TranslationRow> = if opts.include_all {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = ANY($1)",
            E::TRANSLATION_COLUMNS,
            join.table,
            join.fk
        );
        sqlx::query_as(&query).bind(ids).fetch_all(pool).await?
    } else {
        // Only the candidate locales are fetched: the requested one and
        // the fallback.
        let mut locales = vec![opts.default_locale.as_str().to_owned()];
        if let Some(locale) = opts.locale {
            if locale != opts.default_locale {
                locales.insert(0, locale.as_str().to_owned());
            }
        }
        let query = format!(
            "SELECT {} FROM {} WHERE {} = ANY($1) AND locale = ANY($2)",
            E::TRANSLATION_COLUMNS,
            join.table,
            join.fk
        );
        sqlx::query_as(&query)
            .bind(ids)
            .bind(locales)
            .fetch_all(pool)
            .await?
    };

    let mut by_parent: HashMap<DbId, Vec<E::TranslationRow>> = HashMap::new();
    for translation in translations {
        by_parent
            .entry(translation.parent_id())
            .or_default()
            .push(translation);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let candidates = by_parent.remove(&row.id()).unwrap_or_default();
            if opts.include_all {
                Translated {
                    entity: row,
                    translation: None,
                    translations: Some(candidates),
                }
            } else {
                Translated {
                    entity: row,
                    translation: resolve_locale(candidates, opts.locale, opts.default_locale),
                    translations: None,
                }
            }
        })
        .collect())
}

/// Pick the translation row for the requested locale, falling back to the
/// default locale.
fn resolve_locale<T: TranslationRecord>(
    mut candidates: Vec<T>,
    locale: Option<&Locale>,
    default_locale: &Locale,
) -> Option<T> {
    if let Some(locale) = locale {
        if let Some(idx) = candidates
            .iter()
            .position(|t| t.locale() == locale.as_str())
        {
            return Some(candidates.swap_remove(idx));
        }
    }
    candidates
        .iter()
        .position(|t| t.locale() == default_locale.as_str())
        .map(|idx| candidates.swap_remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tr {
        locale: &'static str,
    }

    impl TranslationRecord for Tr {
        fn parent_id(&self) -> DbId {
            1
        }

        fn locale(&self) -> &str {
            self.locale
        }
    }

    fn locale(tag: &str) -> Locale {
        tag.parse().unwrap()
    }

    #[test]
    fn requested_locale_wins() {
        let rows = vec![Tr { locale: "en" }, Tr { locale: "fr" }];
        let resolved = resolve_locale(rows, Some(&locale("fr")), &locale("en")).unwrap();
        assert_eq!(resolved.locale, "fr");
    }

    #[test]
    fn missing_locale_falls_back_to_default() {
        let rows = vec![Tr { locale: "en" }];
        let resolved = resolve_locale(rows, Some(&locale("fr")), &locale("en")).unwrap();
        assert_eq!(resolved.locale, "en");
    }

    #[test]
    fn no_locale_resolves_default() {
        let rows = vec![Tr { locale: "de" }, Tr { locale: "en" }];
        let resolved = resolve_locale(rows, None, &locale("en")).unwrap();
        assert_eq!(resolved.locale, "en");
    }

    #[test]
    fn nothing_matches_yields_none() {
        let rows = vec![Tr { locale: "de" }];
        assert!(resolve_locale(rows, Some(&locale("fr")), &locale("en")).is_none());
    }
}
