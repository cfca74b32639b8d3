//! Filter/sort decoding and normalization.
//!
//! Client filter and sort expressions usually arrive as JSON-encoded
//! query-string parameters. Decoding is deliberately permissive: input
//! that fails to parse as a structured expression is carried through as a
//! literal and rejected at field validation, never with a decode failure.
//! Validation is strict: a field must be in the entity's
//! [`FieldTable`](super::fields::FieldTable) allow-list and the operator
//! must match the field's data type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::fields::{FieldKind, FieldTable, FieldTarget, ResolvedField};
use crate::error::CoreError;
use crate::types::Timestamp;

/// Supported filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Like,
    ILike,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOperator {
    /// Ordering comparisons, valid for numeric and date fields only.
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Gt | Self::Gte | Self::Lt | Self::Lte)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Like => "like",
            Self::ILike => "ilike",
            Self::In => "in",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Eq),
            "ne" => Ok(Self::Ne),
            "like" => Ok(Self::Like),
            "ilike" => Ok(Self::ILike),
            "in" => Ok(Self::In),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            other => Err(CoreError::Validation(format!(
                "unsupported filter operator `{other}`"
            ))),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(CoreError::Validation(format!(
                "sort order must be `asc` or `desc`, got `{other}`"
            ))),
        }
    }
}

/// A structured filter expression as received from the client.
///
/// `operator` stays a string until normalization so an unknown operator is
/// reported as a validation error rather than a decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterExpr {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: Value,
}

/// A structured sort directive as received from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct SortExpr {
    pub field: String,
    #[serde(default = "default_order")]
    pub order: String,
}

fn default_order() -> String {
    "asc".to_string()
}

/// Decoded filter input: either a structured expression, or the raw text
/// carried through after a failed structured decode.
#[derive(Debug, Clone)]
pub enum FilterInput {
    Expr(FilterExpr),
    Literal(String),
}

impl FilterInput {
    /// Decode a raw query-string value. Never fails: input that does not
    /// parse as a filter object degrades to [`FilterInput::Literal`].
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<FilterExpr>(raw) {
            Ok(expr) => Self::Expr(expr),
            Err(_) => Self::Literal(raw.to_string()),
        }
    }

    /// Decode an already-parsed JSON value (body-supplied filters).
    pub fn from_value(value: &Value) -> Self {
        match serde_json::from_value::<FilterExpr>(value.clone()) {
            Ok(expr) => Self::Expr(expr),
            Err(_) => Self::Literal(stringify(value)),
        }
    }
}

/// Decoded sort input, mirroring [`FilterInput`].
#[derive(Debug, Clone)]
pub enum SortInput {
    Expr(SortExpr),
    Literal(String),
}

impl SortInput {
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<SortExpr>(raw) {
            Ok(expr) => Self::Expr(expr),
            Err(_) => Self::Literal(raw.to_string()),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        match serde_json::from_value::<SortExpr>(value.clone()) {
            Ok(expr) => Self::Expr(expr),
            Err(_) => Self::Literal(stringify(value)),
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A typed scalar, coerced from JSON according to the field's kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScalarValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Uuid(Uuid),
    DateTime(Timestamp),
    Null,
}

/// A normalized filter value: one scalar, or a list for `in`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FilterValue {
    Scalar(ScalarValue),
    List(Vec<ScalarValue>),
}

/// A fully validated filter, ready for SQL construction.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedFilter {
    pub target: FieldTarget,
    pub kind: FieldKind,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

/// A fully validated sort directive.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedSort {
    pub target: FieldTarget,
    pub order: SortOrder,
}

/// Validate a decoded filter against an entity's field table.
pub fn normalize_filter(
    input: &FilterInput,
    table: &FieldTable,
) -> Result<NormalizedFilter, CoreError> {
    let expr = match input {
        FilterInput::Expr(expr) => expr.clone(),
        // A literal has no structure; treat the raw text as a would-be
        // field name so rejection names exactly what the client sent.
        FilterInput::Literal(raw) => FilterExpr {
            field: raw.clone(),
            operator: "eq".to_string(),
            value: Value::Null,
        },
    };

    let resolved = table.resolve(&expr.field)?;
    let operator: FilterOperator = expr.operator.parse()?;
    check_operator(&expr.field, resolved.kind, operator)?;
    let value = coerce_value(&expr.field, &resolved, operator, &expr.value)?;

    Ok(NormalizedFilter {
        target: resolved.target,
        kind: resolved.kind,
        operator,
        value,
    })
}

/// Validate a decoded sort directive against an entity's field table.
pub fn normalize_sort(input: &SortInput, table: &FieldTable) -> Result<NormalizedSort, CoreError> {
    let expr = match input {
        SortInput::Expr(expr) => expr.clone(),
        SortInput::Literal(raw) => SortExpr {
            field: raw.clone(),
            order: default_order(),
        },
    };

    let resolved = table.resolve(&expr.field)?;
    let order: SortOrder = expr.order.parse()?;

    Ok(NormalizedSort {
        target: resolved.target,
        order,
    })
}

fn check_operator(
    field: &str,
    kind: FieldKind,
    operator: FilterOperator,
) -> Result<(), CoreError> {
    let valid = match operator {
        FilterOperator::Eq | FilterOperator::Ne => true,
        FilterOperator::Like | FilterOperator::ILike => kind == FieldKind::Text,
        FilterOperator::In => kind != FieldKind::Bool,
        op if op.is_ordering() => {
            matches!(kind, FieldKind::Int | FieldKind::Float | FieldKind::DateTime)
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "operator `{operator}` is not valid for field `{field}`"
        )))
    }
}

fn coerce_value(
    field: &str,
    resolved: &ResolvedField,
    operator: FilterOperator,
    value: &Value,
) -> Result<FilterValue, CoreError> {
    if operator == FilterOperator::In {
        let items = value.as_array().ok_or_else(|| {
            CoreError::Validation(format!("operator `in` on `{field}` requires an array value"))
        })?;
        if items.is_empty() {
            return Err(CoreError::Validation(format!(
                "operator `in` on `{field}` requires a non-empty array"
            )));
        }
        let scalars = items
            .iter()
            .map(|item| coerce_scalar(field, resolved.kind, item))
            .collect::<Result<Vec<_>, _>>()?;
        if scalars.contains(&ScalarValue::Null) {
            return Err(CoreError::Validation(format!(
                "operator `in` on `{field}` does not accept null elements"
            )));
        }
        return Ok(FilterValue::List(scalars));
    }

    let scalar = coerce_scalar(field, resolved.kind, value)?;
    // NULL only makes sense as an equality test.
    if scalar == ScalarValue::Null && !matches!(operator, FilterOperator::Eq | FilterOperator::Ne)
    {
        return Err(CoreError::Validation(format!(
            "operator `{operator}` on `{field}` requires a non-null value"
        )));
    }
    Ok(FilterValue::Scalar(scalar))
}

fn coerce_scalar(field: &str, kind: FieldKind, value: &Value) -> Result<ScalarValue, CoreError> {
    if value.is_null() {
        return Ok(ScalarValue::Null);
    }
    let mismatch = || {
        CoreError::Validation(format!(
            "value {value} is not valid for field `{field}` ({kind:?})"
        ))
    };
    match kind {
        FieldKind::Text => value
            .as_str()
            .map(|s| ScalarValue::Text(s.to_string()))
            .ok_or_else(mismatch),
        FieldKind::Int => value.as_i64().map(ScalarValue::Int).ok_or_else(mismatch),
        FieldKind::Float => value.as_f64().map(ScalarValue::Float).ok_or_else(mismatch),
        FieldKind::Bool => value.as_bool().map(ScalarValue::Bool).ok_or_else(mismatch),
        FieldKind::Uuid => value
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(ScalarValue::Uuid)
            .ok_or_else(mismatch),
        FieldKind::DateTime => value
            .as_str()
            .and_then(|s| s.parse::<Timestamp>().ok())
            .map(ScalarValue::DateTime)
            .ok_or_else(mismatch),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::query::fields::{FieldSpec, RelationFields};

    static TABLE: FieldTable = FieldTable {
        entity: "Course",
        columns: &[
            FieldSpec::text("slug"),
            FieldSpec::int("price_cents"),
            FieldSpec::boolean("is_published"),
            FieldSpec::datetime("starts_at"),
        ],
        relations: &[RelationFields {
            relation: "translation",
            locale_aware: true,
            fields: &[FieldSpec::text("name")],
        }],
    };

    #[test]
    fn decodes_structured_filter() {
        let input = FilterInput::decode(r#"{"field":"slug","operator":"eq","value":"salsa-101"}"#);
        let normalized = normalize_filter(&input, &TABLE).unwrap();
        assert_matches!(normalized.target, FieldTarget::Column("slug"));
        assert_eq!(normalized.operator, FilterOperator::Eq);
        assert_eq!(
            normalized.value,
            FilterValue::Scalar(ScalarValue::Text("salsa-101".into()))
        );
    }

    #[test]
    fn malformed_filter_degrades_to_literal() {
        // Decode never fails; rejection happens at field validation and
        // names the raw input.
        let input = FilterInput::decode("not json");
        assert_matches!(&input, FilterInput::Literal(raw) if raw == "not json");
        let err = normalize_filter(&input, &TABLE).unwrap_err();
        assert!(err.to_string().contains("not json"));
    }

    #[test]
    fn unknown_field_is_named_in_error() {
        let input =
            FilterInput::decode(r#"{"field":"nonexistentField","operator":"eq","value":1}"#);
        let err = normalize_filter(&input, &TABLE).unwrap_err();
        assert!(err.to_string().contains("nonexistentField"));
    }

    #[test]
    fn like_rejected_for_numeric_field() {
        let input =
            FilterInput::decode(r#"{"field":"price_cents","operator":"like","value":"5%"}"#);
        let err = normalize_filter(&input, &TABLE).unwrap_err();
        assert!(err.to_string().contains("price_cents"));
    }

    #[test]
    fn ordering_rejected_for_bool_field() {
        let input =
            FilterInput::decode(r#"{"field":"is_published","operator":"gt","value":true}"#);
        assert!(normalize_filter(&input, &TABLE).is_err());
    }

    #[test]
    fn ordering_allowed_for_datetime() {
        let input = FilterInput::decode(
            r#"{"field":"starts_at","operator":"gte","value":"2026-01-01T00:00:00Z"}"#,
        );
        let normalized = normalize_filter(&input, &TABLE).unwrap();
        assert_matches!(
            normalized.value,
            FilterValue::Scalar(ScalarValue::DateTime(_))
        );
    }

    #[test]
    fn unknown_operator_is_validation_error() {
        let input = FilterInput::decode(r#"{"field":"slug","operator":"matches","value":"x"}"#);
        let err = normalize_filter(&input, &TABLE).unwrap_err();
        assert!(err.to_string().contains("matches"));
    }

    #[test]
    fn in_requires_non_empty_array() {
        let input = FilterInput::decode(r#"{"field":"slug","operator":"in","value":[]}"#);
        assert!(normalize_filter(&input, &TABLE).is_err());

        let input =
            FilterInput::decode(r#"{"field":"slug","operator":"in","value":["a","b"]}"#);
        let normalized = normalize_filter(&input, &TABLE).unwrap();
        assert_matches!(normalized.value, FilterValue::List(items) if items.len() == 2);
    }

    #[test]
    fn type_mismatch_is_validation_error() {
        let input =
            FilterInput::decode(r#"{"field":"price_cents","operator":"eq","value":"cheap"}"#);
        assert!(normalize_filter(&input, &TABLE).is_err());
    }

    #[test]
    fn translation_field_resolves_locale_aware() {
        let input = FilterInput::decode(
            r#"{"field":"translation.name","operator":"ilike","value":"%salsa%"}"#,
        );
        let normalized = normalize_filter(&input, &TABLE).unwrap();
        assert_matches!(
            normalized.target,
            FieldTarget::Related {
                relation: "translation",
                column: "name",
                locale_aware: true,
            }
        );
    }

    #[test]
    fn sort_defaults_to_ascending() {
        let input = SortInput::decode(r#"{"field":"starts_at"}"#);
        let normalized = normalize_sort(&input, &TABLE).unwrap();
        assert_eq!(normalized.order, SortOrder::Asc);
    }

    #[test]
    fn sort_rejects_unknown_field() {
        let input = SortInput::decode(r#"{"field":"secret","order":"desc"}"#);
        assert!(normalize_sort(&input, &TABLE).is_err());
    }

    #[test]
    fn sort_rejects_bad_order() {
        let input = SortInput::decode(r#"{"field":"slug","order":"sideways"}"#);
        assert!(normalize_sort(&input, &TABLE).is_err());
    }
}
