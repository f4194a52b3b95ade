//! Path-directed document mutation.
//!
//! Reconciles a flat edit map against a document of unknown shape using
//! the collection's path-level type tags. Form submissions flatten
//! structured input into strings and dotted keys, while a JSON-encoded
//! submission carries already-typed values; one routine serves both.

use crate::document::Document;
use crate::schema::{CollectionSchema, PathType};
use serde_json::{Map, Value as JsonValue};

/// Flat mapping from field path to raw submitted value. Transient; lives
/// for the duration of one mutation call. Iteration follows submission
/// order.
pub type PendingEdit = Map<String, JsonValue>;

/// Apply an edit map onto `document` in place.
///
/// Per entry, in map order:
/// - an object value on a non-array path is flattened one level:
///   each sub-key is written as `path.sub`;
/// - a string value on an array path is split on `,` when the edit came
///   from a form (`is_json == false`);
/// - everything else is assigned as-is. An array-typed path that somehow
///   receives an object value falls through to direct assignment.
///
/// Never fails: garbage paths are written into the document and only
/// surface when the store validates on save.
pub fn apply_edits(
    document: &mut Document,
    schema: &dyn CollectionSchema,
    edits: &PendingEdit,
    is_json: bool,
) {
    for (path, value) in edits {
        let ty = schema.path_type(path);
        match value {
            JsonValue::Object(fields) if ty != PathType::Array => {
                for (sub, sub_value) in fields {
                    document.set(&format!("{path}.{sub}"), sub_value.clone());
                }
            }
            JsonValue::String(raw) if ty == PathType::Array && !is_json => {
                let parts = raw
                    .split(',')
                    .map(|part| JsonValue::String(part.to_string()))
                    .collect();
                document.set(path, JsonValue::Array(parts));
            }
            other => document.set(path, other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MapSchema;
    use serde_json::json;

    fn posts_schema() -> MapSchema {
        MapSchema::new("posts")
            .with_path("tags", PathType::Array)
            .with_path("title", PathType::Scalar)
    }

    fn edits(value: JsonValue) -> PendingEdit {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("edit fixture must be an object"),
        }
    }

    #[test]
    fn test_form_string_on_array_path_splits_on_comma() {
        let mut doc = Document::new("posts");
        apply_edits(
            &mut doc,
            &posts_schema(),
            &edits(json!({"tags": "a,b,c"})),
            false,
        );
        assert_eq!(doc.get("tags"), Some(&json!(["a", "b", "c"])));
    }

    #[test]
    fn test_json_string_on_array_path_is_not_split() {
        let mut doc = Document::new("posts");
        apply_edits(
            &mut doc,
            &posts_schema(),
            &edits(json!({"tags": "a,b,c"})),
            true,
        );
        assert_eq!(doc.get("tags"), Some(&json!("a,b,c")));
    }

    #[test]
    fn test_object_on_non_array_path_flattens_one_level() {
        let mut doc = Document::new("posts");
        doc.set("meta.z", json!("kept"));
        apply_edits(
            &mut doc,
            &posts_schema(),
            &edits(json!({"meta": {"x": "1", "y": "2"}})),
            false,
        );
        assert_eq!(doc.get("meta.x"), Some(&json!("1")));
        assert_eq!(doc.get("meta.y"), Some(&json!("2")));
        // sub-keys merge in, the path is not replaced wholesale
        assert_eq!(doc.get("meta.z"), Some(&json!("kept")));
    }

    #[test]
    fn test_scalar_path_assigned_verbatim() {
        let mut doc = Document::new("posts");
        apply_edits(
            &mut doc,
            &posts_schema(),
            &edits(json!({"title": "Hello"})),
            false,
        );
        assert_eq!(doc.get("title"), Some(&json!("Hello")));
    }

    #[test]
    fn test_object_on_array_path_assigned_whole() {
        let mut doc = Document::new("posts");
        apply_edits(
            &mut doc,
            &posts_schema(),
            &edits(json!({"tags": {"0": "a"}})),
            false,
        );
        assert_eq!(doc.get("tags"), Some(&json!({"0": "a"})));
    }

    #[test]
    fn test_typed_json_values_pass_through() {
        let mut doc = Document::new("posts");
        apply_edits(
            &mut doc,
            &posts_schema(),
            &edits(json!({"tags": ["x", "y"], "count": 3})),
            true,
        );
        assert_eq!(doc.get("tags"), Some(&json!(["x", "y"])));
        assert_eq!(doc.get("count"), Some(&json!(3)));
    }
}
