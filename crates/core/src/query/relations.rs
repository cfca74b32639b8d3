//! Relation-path parsing for eager loading.
//!
//! Clients name the related records to load alongside a listing either as
//! dotted strings (`"albums.songs"`) or as nested objects
//! (`{"albums": ["songs", "producer"]}`). Both forms collapse into a
//! [`RelationMap`]: top-level relation name -> nested sub-paths, with
//! first-seen key order preserved so join work happens in request order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One element of a relation specification.
///
/// The two wire shapes are modeled as a sum type so both cases are handled
/// exhaustively instead of by runtime type inspection.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RelationSpec {
    /// `"albums"` or `"albums.songs"`.
    Flat(String),
    /// `{"albums": ["songs", "producer"]}`.
    Nested(IndexMap<String, Vec<String>>),
}

/// Parsed relation map: top-level relation -> ordered nested sub-paths.
///
/// Immutable after construction; owned by the query-execution call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RelationMap(IndexMap<String, Vec<String>>);

impl RelationMap {
    /// Build a map from parsed specification elements.
    ///
    /// Duplicate top-level keys merge into one entry; nested sub-paths are
    /// de-duplicated on append so downstream join logic never repeats
    /// work. Malformed elements (empty names or segments) are skipped.
    pub fn parse(specs: &[RelationSpec]) -> Self {
        let mut map: IndexMap<String, Vec<String>> = IndexMap::new();
        for spec in specs {
            match spec {
                RelationSpec::Flat(path) => {
                    let path = path.trim();
                    match path.split_once('.') {
                        None => {
                            if !path.is_empty() {
                                map.entry(path.to_string()).or_default();
                            }
                        }
                        Some((head, rest)) => {
                            if head.is_empty() || rest.is_empty() {
                                continue;
                            }
                            let nested = map.entry(head.to_string()).or_default();
                            push_unique(nested, rest);
                        }
                    }
                }
                RelationSpec::Nested(entries) => {
                    for (key, children) in entries {
                        let key = key.trim();
                        if key.is_empty() {
                            continue;
                        }
                        let nested = map.entry(key.to_string()).or_default();
                        for child in children {
                            let child = child.trim();
                            if !child.is_empty() {
                                push_unique(nested, child);
                            }
                        }
                    }
                }
            }
        }
        RelationMap(map)
    }

    /// Decode a raw `include` query parameter.
    ///
    /// Accepts a JSON array (mixed strings/objects), a single JSON object,
    /// or a plain comma-separated list of dotted paths. Like filter
    /// decoding this never fails; unparseable JSON falls back to the
    /// comma-separated reading.
    pub fn decode_param(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with('[') {
            if let Ok(specs) = serde_json::from_str::<Vec<RelationSpec>>(trimmed) {
                return Self::parse(&specs);
            }
        } else if trimmed.starts_with('{') {
            if let Ok(spec) = serde_json::from_str::<RelationSpec>(trimmed) {
                return Self::parse(std::slice::from_ref(&spec));
            }
        }
        let flat: Vec<RelationSpec> = trimmed
            .split(',')
            .map(|part| RelationSpec::Flat(part.to_string()))
            .collect();
        Self::parse(&flat)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.0.contains_key(relation)
    }

    /// Nested sub-paths registered under a top-level relation.
    pub fn children(&self, relation: &str) -> &[String] {
        self.0.get(relation).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Reject relation names the entity does not expose.
    ///
    /// Malformed elements were already dropped at parse time; a
    /// well-formed but unknown name is a client error, not noise, so a
    /// typo does not silently drop an eager load.
    pub fn ensure_allowed(&self, entity: &str, allowed: &[&str]) -> Result<(), CoreError> {
        for (relation, _) in self.iter() {
            if !allowed.contains(&relation) {
                return Err(CoreError::Validation(format!(
                    "unknown relation `{relation}` for {entity}"
                )));
            }
        }
        Ok(())
    }
}

fn push_unique(nested: &mut Vec<String>, entry: &str) {
    if !nested.iter().any(|existing| existing == entry) {
        nested.push(entry.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(s: &str) -> RelationSpec {
        RelationSpec::Flat(s.to_string())
    }

    fn nested(key: &str, children: &[&str]) -> RelationSpec {
        let mut map = IndexMap::new();
        map.insert(
            key.to_string(),
            children.iter().map(|c| c.to_string()).collect(),
        );
        RelationSpec::Nested(map)
    }

    #[test]
    fn dotted_string_splits_at_first_dot() {
        let map = RelationMap::parse(&[flat("albums.songs")]);
        assert_eq!(map.children("albums"), ["songs"]);
    }

    #[test]
    fn deep_dotted_string_keeps_remainder_as_one_path() {
        let map = RelationMap::parse(&[flat("albums.songs.credits")]);
        assert_eq!(map.children("albums"), ["songs.credits"]);
    }

    #[test]
    fn bare_string_registers_empty_entry() {
        let map = RelationMap::parse(&[flat("venue")]);
        assert!(map.contains("venue"));
        assert!(map.children("venue").is_empty());
    }

    #[test]
    fn nested_object_form() {
        let map = RelationMap::parse(&[nested("albums", &["songs", "producer"])]);
        assert_eq!(map.children("albums"), ["songs", "producer"]);
    }

    #[test]
    fn duplicate_top_level_keys_merge() {
        let map = RelationMap::parse(&[flat("albums"), flat("albums.songs")]);
        assert_eq!(map.iter().count(), 1);
        assert_eq!(map.children("albums"), ["songs"]);
    }

    #[test]
    fn nested_entries_are_deduplicated() {
        let map = RelationMap::parse(&[
            flat("albums.songs"),
            nested("albums", &["songs", "producer"]),
        ]);
        assert_eq!(map.children("albums"), ["songs", "producer"]);
    }

    #[test]
    fn first_seen_order_is_preserved() {
        let map = RelationMap::parse(&[flat("venue"), flat("albums.songs"), flat("lessons")]);
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["venue", "albums", "lessons"]);
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let map = RelationMap::parse(&[flat(""), flat(".songs"), flat("albums.")]);
        assert!(map.is_empty());
    }

    #[test]
    fn decode_json_array_param() {
        let map = RelationMap::decode_param(r#"["venue", {"albums": ["songs"]}]"#);
        assert!(map.contains("venue"));
        assert_eq!(map.children("albums"), ["songs"]);
    }

    #[test]
    fn decode_comma_separated_param() {
        let map = RelationMap::decode_param("venue,albums.songs");
        assert!(map.contains("venue"));
        assert_eq!(map.children("albums"), ["songs"]);
    }

    #[test]
    fn unknown_relation_rejected() {
        let map = RelationMap::decode_param("bogus");
        let err = map.ensure_allowed("Course", &["lessons", "venue"]).unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }
}
