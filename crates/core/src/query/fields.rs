//! Per-entity field allow-lists.
//!
//! Filterable/sortable fields are declared as static tables rather than
//! discovered at runtime: each entity lists its own columns plus the
//! fields reachable through a joined relation (one dotted hop, e.g.
//! `translation.name`). Resolution against the table is the only place a
//! client-supplied field name is accepted into a query.

use serde::Serialize;

use crate::error::CoreError;

/// Underlying data type of a filterable field. Decides which operators
/// apply and how JSON values are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Text,
    Int,
    Float,
    Bool,
    DateTime,
    Uuid,
}

/// One allow-listed field. `name` is both the API-facing identifier and
/// the SQL column name; the two are kept identical by convention.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Int,
        }
    }

    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Float,
        }
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Bool,
        }
    }

    pub const fn datetime(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::DateTime,
        }
    }

    pub const fn uuid(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Uuid,
        }
    }
}

/// Fields reachable through a joined relation.
///
/// `locale_aware` marks translation tables: predicates against them are
/// additionally constrained by the request locale.
#[derive(Debug, Clone, Copy)]
pub struct RelationFields {
    pub relation: &'static str,
    pub locale_aware: bool,
    pub fields: &'static [FieldSpec],
}

/// The complete allow-list for one entity.
#[derive(Debug, Clone, Copy)]
pub struct FieldTable {
    /// Entity name used in validation error messages ("Course").
    pub entity: &'static str,
    pub columns: &'static [FieldSpec],
    pub relations: &'static [RelationFields],
}

/// Where a resolved field lives: a local column, or a column on a joined
/// relation's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldTarget {
    Column(&'static str),
    Related {
        relation: &'static str,
        column: &'static str,
        locale_aware: bool,
    },
}

/// A validated field reference, ready for SQL construction.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResolvedField {
    pub target: FieldTarget,
    pub kind: FieldKind,
}

impl FieldTable {
    /// Resolve a client-supplied field name.
    ///
    /// Accepts either a bare column name from `columns` or a two-segment
    /// dotted path whose first segment names a declared relation. Any
    /// other input fails with a validation error naming the field.
    pub fn resolve(&self, field: &str) -> Result<ResolvedField, CoreError> {
        match field.split_once('.') {
            None => self
                .columns
                .iter()
                .find(|spec| spec.name == field)
                .map(|spec| ResolvedField {
                    target: FieldTarget::Column(spec.name),
                    kind: spec.kind,
                })
                .ok_or_else(|| CoreError::unknown_field(self.entity, field)),
            Some((relation, column)) => {
                // Deeper nesting ("a.b.c") is never filterable.
                if column.contains('.') {
                    return Err(CoreError::unknown_field(self.entity, field));
                }
                let rel = self
                    .relations
                    .iter()
                    .find(|rel| rel.relation == relation)
                    .ok_or_else(|| CoreError::unknown_field(self.entity, field))?;
                rel.fields
                    .iter()
                    .find(|spec| spec.name == column)
                    .map(|spec| ResolvedField {
                        target: FieldTarget::Related {
                            relation: rel.relation,
                            column: spec.name,
                            locale_aware: rel.locale_aware,
                        },
                        kind: spec.kind,
                    })
                    .ok_or_else(|| CoreError::unknown_field(self.entity, field))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TABLE: FieldTable = FieldTable {
        entity: "Course",
        columns: &[
            FieldSpec::text("slug"),
            FieldSpec::int("price_cents"),
            FieldSpec::boolean("is_published"),
        ],
        relations: &[RelationFields {
            relation: "translation",
            locale_aware: true,
            fields: &[FieldSpec::text("name"), FieldSpec::text("description")],
        }],
    };

    #[test]
    fn resolves_local_column() {
        let resolved = TABLE.resolve("price_cents").unwrap();
        assert_eq!(resolved.target, FieldTarget::Column("price_cents"));
        assert_eq!(resolved.kind, FieldKind::Int);
    }

    #[test]
    fn resolves_translation_field() {
        let resolved = TABLE.resolve("translation.name").unwrap();
        assert_eq!(
            resolved.target,
            FieldTarget::Related {
                relation: "translation",
                column: "name",
                locale_aware: true,
            }
        );
        assert_eq!(resolved.kind, FieldKind::Text);
    }

    #[test]
    fn rejects_unknown_field_naming_it() {
        let err = TABLE.resolve("nonexistentField").unwrap_err();
        assert!(err.to_string().contains("nonexistentField"));
    }

    #[test]
    fn rejects_unknown_relation() {
        assert!(TABLE.resolve("venue.name").is_err());
    }

    #[test]
    fn rejects_unknown_relation_column() {
        assert!(TABLE.resolve("translation.slug").is_err());
    }

    #[test]
    fn rejects_deep_paths() {
        assert!(TABLE.resolve("translation.name.length").is_err());
    }
}
