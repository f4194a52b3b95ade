//! Dynamic document model.
//!
//! A document belongs to exactly one collection and carries arbitrarily
//! shaped JSON. Fields are addressed by dotted paths; writing through a
//! path creates the intermediate objects it names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub collection: String,
    pub data: JsonValue,
}

impl Document {
    /// Fresh, empty document bound to a collection, with a generated id.
    pub fn new(collection: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), collection)
    }

    pub fn with_id(id: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            collection: collection.into(),
            data: JsonValue::Object(Map::new()),
        }
    }

    /// Write `value` at a dotted path, creating intermediate objects.
    /// A non-object value sitting where an intermediate segment lands is
    /// replaced by an object.
    pub fn set(&mut self, path: &str, value: JsonValue) {
        let (parents, leaf) = match path.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, path),
        };

        let mut node = &mut self.data;
        if let Some(parents) = parents {
            for segment in parents.split('.') {
                node = force_object(node)
                    .entry(segment.to_string())
                    .or_insert_with(|| JsonValue::Object(Map::new()));
            }
        }
        force_object(node).insert(leaf.to_string(), value);
    }

    /// Read the value at a dotted path, if present.
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        let mut node = &self.data;
        for segment in path.split('.') {
            node = node.as_object()?.get(segment)?;
        }
        Some(node)
    }
}

fn force_object(node: &mut JsonValue) -> &mut Map<String, JsonValue> {
    if !node.is_object() {
        *node = JsonValue::Object(Map::new());
    }
    match node {
        JsonValue::Object(map) => map,
        _ => unreachable!("node was just set to an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_top_level_field() {
        let mut doc = Document::new("posts");
        doc.set("title", json!("Hello"));
        assert_eq!(doc.get("title"), Some(&json!("Hello")));
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut doc = Document::new("posts");
        doc.set("meta.author.name", json!("Ada"));
        assert_eq!(doc.get("meta.author.name"), Some(&json!("Ada")));
        assert_eq!(doc.get("meta.author"), Some(&json!({"name": "Ada"})));
    }

    #[test]
    fn test_set_replaces_scalar_intermediate() {
        let mut doc = Document::new("posts");
        doc.set("meta", json!("not an object"));
        doc.set("meta.x", json!(1));
        assert_eq!(doc.get("meta.x"), Some(&json!(1)));
    }

    #[test]
    fn test_get_missing_path_is_none() {
        let doc = Document::new("posts");
        assert_eq!(doc.get("nope.really"), None);
    }
}
