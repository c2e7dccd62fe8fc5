//! Relation references
//!
//! The academic API returns relations to other entities in three shapes:
//! a bare identifier, a populated record, or a wrapper record that nests the
//! reference one level down (`{"estudiante": ...}`). This module classifies a
//! JSON value into one of those shapes and resolves it into an [`EntityRef`].

use serde::Serialize;
use serde_json::{Map, Value};

/// Id fields, in preference order
pub const ID_FIELDS: [&str; 3] = ["_id", "uid", "id"];

/// Display-name fields, in preference order
pub const NAME_FIELDS: [&str; 3] = ["nombre", "fullname", "email"];

/// Wrapper fields that nest a reference one level down
pub const NESTED_FIELDS: [&str; 4] = ["estudiante", "materia", "alumno", "usuario"];

/// Shape of a relation value as it appears in a payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefShape<'a> {
    /// Bare identifier (string or number)
    Id(&'a Value),
    /// Record carrying its own id field
    Populated(&'a Map<String, Value>),
    /// Wrapper record whose reference lives under `key`
    Nested {
        key: &'static str,
        wrapper: &'a Map<String, Value>,
        inner: &'a Value,
    },
    /// Nothing usable
    Unresolvable,
}

impl<'a> RefShape<'a> {
    /// Classify a JSON value.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) if !s.trim().is_empty() => RefShape::Id(value),
            Value::Number(_) => RefShape::Id(value),
            Value::Object(map) => {
                if own_id(map).is_some() {
                    return RefShape::Populated(map);
                }
                NESTED_FIELDS
                    .iter()
                    .find_map(|&key| {
                        map.get(key)
                            .filter(|inner| is_flat_ref(inner))
                            .map(|inner| RefShape::Nested {
                                key,
                                wrapper: map,
                                inner,
                            })
                    })
                    .unwrap_or(RefShape::Unresolvable)
            }
            _ => RefShape::Unresolvable,
        }
    }
}

/// Canonical `{id, name?}` pair for a relation
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct EntityRef {
    /// Resolved identifier, empty when the value could not be resolved
    pub id: String,
    /// Best-effort display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityRef {
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
        }
    }

    /// Whether an id was found
    pub fn is_resolved(&self) -> bool {
        !self.id.is_empty()
    }

    /// Name to show in a table; falls back to the raw id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Resolve any relation value into an [`EntityRef`].
///
/// Never fails: values without a usable id resolve to an empty id, which
/// callers are expected to filter out.
pub fn normalize_ref(value: &Value) -> EntityRef {
    match RefShape::classify(value) {
        RefShape::Id(raw) => EntityRef::new(scalar_id(raw).unwrap_or_default(), None),
        RefShape::Populated(map) => EntityRef::new(own_id(map).unwrap_or_default(), own_name(map)),
        RefShape::Nested { wrapper, inner, .. } => {
            let (id, name) = match inner {
                Value::Object(map) => (own_id(map), own_name(map)),
                other => (scalar_id(other), None),
            };
            EntityRef::new(id.unwrap_or_default(), name.or_else(|| own_name(wrapper)))
        }
        RefShape::Unresolvable => EntityRef::default(),
    }
}

/// Shorthand for the resolved id alone.
pub fn ref_id(value: &Value) -> String {
    normalize_ref(value).id
}

/// Resolve the first of `fields` on `record` that yields an id.
pub fn ref_from_fields(record: &Value, fields: &[&str]) -> EntityRef {
    fields
        .iter()
        .filter_map(|field| record.get(*field))
        .map(normalize_ref)
        .find(EntityRef::is_resolved)
        .unwrap_or_default()
}

fn own_id(map: &Map<String, Value>) -> Option<String> {
    ID_FIELDS
        .iter()
        .filter_map(|field| map.get(*field))
        .find_map(scalar_id)
}

fn own_name(map: &Map<String, Value>) -> Option<String> {
    NAME_FIELDS.iter().find_map(|field| {
        map.get(*field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A nested value may be a bare id or a populated record, but not another wrapper.
fn is_flat_ref(value: &Value) -> bool {
    match value {
        Value::Object(map) => own_id(map).is_some(),
        other => scalar_id(other).is_some(),
    }
}
