//! Shared query parameter types for API handlers.
//!
//! List endpoints accept the platform's standard parameters (camelCase,
//! matching the existing clients): `filter`/`sort` as JSON-encoded
//! expressions, `include` for eager loads, `page`/`limit`, `locale`, and
//! `includeAllTranslations`. Decoding is permissive; validation happens
//! against each entity's field table via [`ListParams::normalize`].

use danza_core::error::CoreError;
use danza_core::locale::Locale;
use danza_core::query::fields::FieldTable;
use danza_core::query::request::{normalize_list_request, ListRequest, RawListRequest};
use serde::Deserialize;

use crate::error::AppResult;

/// Generic list parameters accepted by every paginated endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub include: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub locale: Option<String>,
    #[serde(default)]
    pub include_all_translations: bool,
}

impl ListParams {
    /// Validate against an entity's field table and relation allow-list.
    pub fn normalize(
        &self,
        table: &'static FieldTable,
        allowed_relations: &[&str],
    ) -> AppResult<ListRequest> {
        let raw = RawListRequest {
            filter: self.filter.as_deref(),
            sort: self.sort.as_deref(),
            include: self.include.as_deref(),
            page: self.page,
            limit: self.limit,
            locale: self.locale.as_deref(),
            include_all_translations: self.include_all_translations,
        };
        Ok(normalize_list_request(&raw, table, allowed_relations)?)
    }
}

/// Parameters for single-entity reads of translatable entities.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetParams {
    pub locale: Option<String>,
    #[serde(default)]
    pub include_all_translations: bool,
    pub include: Option<String>,
}

impl GetParams {
    /// Parse the requested locale, if any.
    pub fn locale(&self) -> Result<Option<Locale>, CoreError> {
        self.locale
            .as_deref()
            .map(|tag| tag.parse::<Locale>())
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use danza_core::query::fields::FieldSpec;

    use super::*;

    static TABLE: FieldTable = FieldTable {
        entity: "User",
        columns: &[FieldSpec::text("email")],
        relations: &[],
    };

    #[test]
    fn normalize_rejects_unknown_field() {
        let params = ListParams {
            filter: Some(r#"{"field":"secret","operator":"eq","value":1}"#.into()),
            ..Default::default()
        };
        assert!(params.normalize(&TABLE, &[]).is_err());
    }

    #[test]
    fn normalize_accepts_defaults() {
        let params = ListParams::default();
        let req = params.normalize(&TABLE, &[]).unwrap();
        assert_eq!(req.page.page, 1);
        assert_eq!(req.page.limit, 10);
    }

    #[test]
    fn get_params_parse_locale() {
        let params = GetParams {
            locale: Some("PT-BR".into()),
            ..Default::default()
        };
        assert_eq!(params.locale().unwrap().unwrap().as_str(), "pt-br");
        let bad = GetParams {
            locale: Some("nope".into()),
            ..Default::default()
        };
        assert!(bad.locale().is_err());
    }
}
