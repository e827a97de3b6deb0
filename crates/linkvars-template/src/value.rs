/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Document property values and the property lookup seam.
//!
//! Property values come from a document's metadata block and can be of any
//! shape. **Important**: the engine never parses metadata itself; the
//! collaborator hands over a [`PropertySource`] for the active document.

use indexmap::IndexMap;
use std::fmt;

/// Metadata of one document, in source order.
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// A document metadata value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<PropertyValue>),
    Map(PropertyMap),
    #[default]
    Null,
}

impl PropertyValue {
    /// Convert to a JSON value (used for the canonical form of maps).
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            PropertyValue::String(s) => Value::String(s.clone()),
            PropertyValue::Integer(i) => Value::from(*i),
            PropertyValue::Float(f) => {
                serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number)
            }
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            PropertyValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            PropertyValue::Null => Value::Null,
        }
    }
}

/// Canonical string form used when a property is substituted into a template.
///
/// - String: as-is
/// - Integer/Float: shortest decimal form (`2.0` renders as `2`)
/// - Bool: `true` / `false`
/// - List: elements joined with `,`
/// - Map: compact JSON
/// - Null: empty
impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::Integer(i) => write!(f, "{i}"),
            PropertyValue::Float(x) => write!(f, "{x}"),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            PropertyValue::Map(_) => write!(f, "{}", self.to_json()),
            PropertyValue::Null => Ok(()),
        }
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Integer(i),
                None => PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => PropertyValue::String(s),
            Value::Array(items) => {
                PropertyValue::List(items.into_iter().map(PropertyValue::from).collect())
            }
            Value::Object(map) => PropertyValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, PropertyValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

/// Outcome of looking up a property on the active document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyLookup<'a> {
    /// The active document is not one whose metadata can be read.
    NotStructural,
    /// The document has no metadata block.
    NoMetadata,
    /// Metadata exists but does not define the property.
    Missing,
    Found(&'a PropertyValue),
}

/// Collaborator-supplied access to the active document's metadata.
pub trait PropertySource {
    /// Look up `name`, case-insensitively.
    fn lookup(&self, name: &str) -> PropertyLookup<'_>;

    /// Name of the document, for error messages.
    fn document_name(&self) -> Option<&str> {
        None
    }
}

/// Property source for contexts without an active document.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocument;

impl PropertySource for NoDocument {
    fn lookup(&self, _name: &str) -> PropertyLookup<'_> {
        PropertyLookup::NotStructural
    }
}

/// In-memory snapshot of one document's metadata.
#[derive(Debug, Clone, Default)]
pub struct DocumentProperties {
    name: String,
    structural: bool,
    metadata: Option<PropertyMap>,
}

impl DocumentProperties {
    /// A document whose metadata can be read. `None` means no metadata block.
    pub fn structural(name: impl Into<String>, metadata: Option<PropertyMap>) -> Self {
        Self {
            name: name.into(),
            structural: true,
            metadata,
        }
    }

    /// A document of a type that carries no readable metadata (an image, a PDF, ...).
    pub fn other(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            structural: false,
            metadata: None,
        }
    }
}

impl PropertySource for DocumentProperties {
    fn lookup(&self, name: &str) -> PropertyLookup<'_> {
        if !self.structural {
            return PropertyLookup::NotStructural;
        }
        let Some(metadata) = &self.metadata else {
            return PropertyLookup::NoMetadata;
        };
        if let Some(value) = metadata.get(name) {
            return PropertyLookup::Found(value);
        }
        let wanted = name.to_lowercase();
        metadata
            .iter()
            .find(|(key, _)| key.to_lowercase() == wanted)
            .map_or(PropertyLookup::Missing, |(_, value)| {
                PropertyLookup::Found(value)
            })
    }

    fn document_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_strings() {
        assert_eq!(PropertyValue::from("x/y").to_string(), "x/y");
        assert_eq!(PropertyValue::Integer(42).to_string(), "42");
        assert_eq!(PropertyValue::Float(2.5).to_string(), "2.5");
        assert_eq!(PropertyValue::Float(2.0).to_string(), "2");
        assert_eq!(PropertyValue::Bool(false).to_string(), "false");
        assert_eq!(PropertyValue::Null.to_string(), "");

        let list = PropertyValue::from(json!(["a", 1, true]));
        assert_eq!(list.to_string(), "a,1,true");

        let map = PropertyValue::from(json!({"b": 1, "a": "x"}));
        assert_eq!(map.to_string(), r#"{"a":"x","b":1}"#);
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(PropertyValue::from(json!(7)), PropertyValue::Integer(7));
        assert_eq!(PropertyValue::from(json!(0.25)), PropertyValue::Float(0.25));
    }

    #[test]
    fn test_document_lookup_is_case_insensitive() {
        let mut metadata = PropertyMap::new();
        metadata.insert("Today".to_string(), PropertyValue::from("2025-01-01"));
        let doc = DocumentProperties::structural("note.md", Some(metadata));

        assert_eq!(
            doc.lookup("today"),
            PropertyLookup::Found(&PropertyValue::from("2025-01-01"))
        );
        assert_eq!(
            doc.lookup("TODAY"),
            PropertyLookup::Found(&PropertyValue::from("2025-01-01"))
        );
        assert_eq!(doc.lookup("missing"), PropertyLookup::Missing);
    }

    #[test]
    fn test_document_without_metadata() {
        let doc = DocumentProperties::structural("empty.md", None);
        assert_eq!(doc.lookup("anything"), PropertyLookup::NoMetadata);

        let image = DocumentProperties::other("photo.png");
        assert_eq!(image.lookup("anything"), PropertyLookup::NotStructural);
        assert_eq!(NoDocument.lookup("anything"), PropertyLookup::NotStructural);
    }
}
