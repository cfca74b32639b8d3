//! Request normalization: raw inbound parameters -> one validated
//! [`ListRequest`].
//!
//! Handlers call [`normalize_list_request`] once at the edge; everything
//! downstream (repositories, cache keys) works with typed data only.

use serde::Serialize;

use super::fields::FieldTable;
use super::filter::{
    normalize_filter, normalize_sort, FilterInput, NormalizedFilter, NormalizedSort, SortInput,
};
use super::pagination::PageQuery;
use super::relations::RelationMap;
use crate::error::CoreError;
use crate::locale::Locale;

/// Raw list parameters as they arrive from the transport layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawListRequest<'a> {
    pub filter: Option<&'a str>,
    pub sort: Option<&'a str>,
    pub include: Option<&'a str>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub locale: Option<&'a str>,
    pub include_all_translations: bool,
}

/// A fully validated list request.
///
/// Serializable so the cache-key builder can derive a deterministic
/// discriminator from the normalized (not raw) request: two inputs that
/// normalize identically share a cache entry.
#[derive(Debug, Clone, Serialize)]
pub struct ListRequest {
    pub page: PageQuery,
    pub filter: Option<NormalizedFilter>,
    pub sort: Option<NormalizedSort>,
    pub relations: RelationMap,
    pub locale: Option<Locale>,
    pub include_all_translations: bool,
}

impl ListRequest {
    /// A request with defaults only, useful as a starting point in tests
    /// and internal callers.
    pub fn unfiltered() -> Self {
        Self {
            page: PageQuery::default(),
            filter: None,
            sort: None,
            relations: RelationMap::default(),
            locale: None,
            include_all_translations: false,
        }
    }
}

/// Validate raw parameters against an entity's field table and relation
/// allow-list.
///
/// Decode failures on `filter`/`sort`/`include` never surface here (the
/// permissive-decode policy); validation failures do, naming the offending
/// input.
pub fn normalize_list_request(
    raw: &RawListRequest<'_>,
    table: &FieldTable,
    allowed_relations: &[&str],
) -> Result<ListRequest, CoreError> {
    let page = PageQuery::new(raw.page, raw.limit)?;

    let filter = raw
        .filter
        .map(|raw| normalize_filter(&FilterInput::decode(raw), table))
        .transpose()?;

    let sort = raw
        .sort
        .map(|raw| normalize_sort(&SortInput::decode(raw), table))
        .transpose()?;

    let relations = raw
        .include
        .map(RelationMap::decode_param)
        .unwrap_or_default();
    relations.ensure_allowed(table.entity, allowed_relations)?;

    let locale = raw.locale.map(|tag| tag.parse::<Locale>()).transpose()?;

    Ok(ListRequest {
        page,
        filter,
        sort,
        relations,
        locale,
        include_all_translations: raw.include_all_translations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fields::{FieldSpec, RelationFields};

    static TABLE: FieldTable = FieldTable {
        entity: "Course",
        columns: &[FieldSpec::text("slug"), FieldSpec::int("price_cents")],
        relations: &[RelationFields {
            relation: "translation",
            locale_aware: true,
            fields: &[FieldSpec::text("name")],
        }],
    };

    #[test]
    fn normalizes_full_request() {
        let raw = RawListRequest {
            filter: Some(r#"{"field":"translation.name","operator":"ilike","value":"%tango%"}"#),
            sort: Some(r#"{"field":"price_cents","order":"desc"}"#),
            include: Some("lessons"),
            page: Some(2),
            limit: Some(20),
            locale: Some("de"),
            include_all_translations: false,
        };
        let req = normalize_list_request(&raw, &TABLE, &["lessons", "venue"]).unwrap();
        assert_eq!(req.page.page, 2);
        assert_eq!(req.page.limit, 20);
        assert!(req.filter.is_some());
        assert!(req.sort.is_some());
        assert!(req.relations.contains("lessons"));
        assert_eq!(req.locale.unwrap().as_str(), "de");
    }

    #[test]
    fn defaults_when_everything_absent() {
        let req =
            normalize_list_request(&RawListRequest::default(), &TABLE, &[]).unwrap();
        assert_eq!(req.page.page, 1);
        assert_eq!(req.page.limit, 10);
        assert!(req.filter.is_none());
        assert!(req.sort.is_none());
        assert!(req.relations.is_empty());
    }

    #[test]
    fn bad_field_fails_normalization() {
        let raw = RawListRequest {
            filter: Some(r#"{"field":"password","operator":"eq","value":"x"}"#),
            ..Default::default()
        };
        assert!(normalize_list_request(&raw, &TABLE, &[]).is_err());
    }

    #[test]
    fn unknown_relation_fails_normalization() {
        let raw = RawListRequest {
            include: Some("payments"),
            ..Default::default()
        };
        assert!(normalize_list_request(&raw, &TABLE, &["lessons"]).is_err());
    }

    #[test]
    fn invalid_locale_fails_normalization() {
        let raw = RawListRequest {
            locale: Some("klingon"),
            ..Default::default()
        };
        assert!(normalize_list_request(&raw, &TABLE, &[]).is_err());
    }
}
