//! The generic list-query layer.
//!
//! Every paginated endpoint goes through the same pipeline:
//!
//! 1. [`filter`] decodes and validates client filter/sort expressions
//!    against an entity's [`fields::FieldTable`] allow-list.
//! 2. [`relations`] parses the requested eager-load paths into an ordered
//!    [`relations::RelationMap`].
//! 3. [`pagination`] bounds page/limit and computes the response envelope.
//! 4. [`request`] ties the steps together into one [`request::ListRequest`]
//!    that repositories and the cache-key builder both consume.

pub mod fields;
pub mod filter;
pub mod pagination;
pub mod relations;
pub mod request;

pub use fields::{FieldKind, FieldSpec, FieldTable, FieldTarget, RelationFields, ResolvedField};
pub use filter::{
    FilterInput, FilterOperator, FilterValue, NormalizedFilter, NormalizedSort, ScalarValue,
    SortInput, SortOrder,
};
pub use pagination::{Page, PageQuery, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
pub use relations::{RelationMap, RelationSpec};
pub use request::{normalize_list_request, ListRequest, RawListRequest};
