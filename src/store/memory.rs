//! In-memory [`Collection`] backed by a `tokio` RwLock.
//!
//! Reference store implementation: exact-match filtering, scalar sort,
//! and required-path validation on save. Find and count take the lock
//! independently, so a listing's items and total can disagree under
//! concurrent writes.

use crate::core::{FieldErrors, Result, SaveError};
use crate::document::Document;
use crate::schema::{CollectionSchema, MapSchema};
use crate::store::{Collection, FindOptions};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use tokio::sync::RwLock;

pub struct MemoryCollection {
    schema: MapSchema,
    required: Vec<String>,
    docs: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new(schema: MapSchema) -> Self {
        Self {
            schema,
            required: Vec::new(),
            docs: RwLock::new(Vec::new()),
        }
    }

    /// Declare a path that must be present and non-empty on save.
    pub fn require(mut self, path: impl Into<String>) -> Self {
        self.required.push(path.into());
        self
    }

    /// Insert without validation, for seeding fixtures.
    pub async fn seed(&self, document: Document) {
        self.docs.write().await.push(document);
    }

    fn validate(&self, document: &Document) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for path in &self.required {
            let missing = match document.get(path) {
                None | Some(JsonValue::Null) => true,
                Some(JsonValue::String(s)) => s.is_empty(),
                Some(_) => false,
            };
            if missing {
                errors.insert(path.clone(), format!("Path `{path}` is required."));
            }
        }
        errors
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        self.schema.name()
    }

    fn schema(&self) -> &dyn CollectionSchema {
        &self.schema
    }

    async fn execute_find(
        &self,
        filter: JsonValue,
        options: FindOptions,
    ) -> Result<Vec<Document>> {
        let docs = self.docs.read().await;
        let mut matched: Vec<Document> = docs
            .iter()
            .filter(|doc| matches_filter(doc, &filter))
            .cloned()
            .collect();
        drop(docs);

        if let Some(sort) = &options.sort {
            matched.sort_by(|a, b| {
                let ordering = compare_fields(a.get(&sort.field), b.get(&sort.field));
                if sort.direction < 0 {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let skip = options.skip.unwrap_or(0).max(0) as usize;
        let mut page: Vec<Document> = matched.into_iter().skip(skip).collect();
        if let Some(limit) = options.limit {
            page.truncate(limit.max(0) as usize);
        }
        Ok(page)
    }

    async fn count_documents(&self) -> Result<u64> {
        Ok(self.docs.read().await.len() as u64)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>> {
        Ok(self
            .docs
            .read()
            .await
            .iter()
            .find(|doc| doc.id == id)
            .cloned())
    }

    async fn save(&self, document: &Document) -> std::result::Result<Document, SaveError> {
        let errors = self.validate(document);
        if !errors.is_empty() {
            return Err(SaveError::Validation { errors });
        }

        let mut docs = self.docs.write().await;
        match docs.iter_mut().find(|existing| existing.id == document.id) {
            Some(existing) => *existing = document.clone(),
            None => docs.push(document.clone()),
        }
        Ok(document.clone())
    }

    async fn delete_one(&self, id: &str) -> Result<()> {
        self.docs.write().await.retain(|doc| doc.id != id);
        Ok(())
    }
}

/// Exact-match filtering: every filter key must equal the document's
/// value at that path. Empty or non-object filters match everything.
fn matches_filter(document: &Document, filter: &JsonValue) -> bool {
    match filter {
        JsonValue::Object(conditions) => conditions
            .iter()
            .all(|(path, expected)| document.get(path) == Some(expected)),
        _ => true,
    }
}

fn compare_fields(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

/// Scalar ordering: null first, then bools, numbers, strings; anything
/// else falls back to its serialized form.
fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Null, JsonValue::Null) => Ordering::Equal,
        (JsonValue::Null, _) => Ordering::Less,
        (_, JsonValue::Null) => Ordering::Greater,
        (JsonValue::Bool(a), JsonValue::Bool(b)) => a.cmp(b),
        (JsonValue::Number(a), JsonValue::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (JsonValue::String(a), JsonValue::String(b)) => a.cmp(b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::SortState;
    use crate::schema::PathType;
    use serde_json::json;

    fn doc(id: &str, data: JsonValue) -> Document {
        let mut doc = Document::with_id(id, "posts");
        doc.data = data;
        doc
    }

    fn posts() -> MemoryCollection {
        MemoryCollection::new(MapSchema::new("posts").with_path("tags", PathType::Array))
    }

    #[tokio::test]
    async fn test_find_filters_by_exact_match() {
        let col = posts();
        col.seed(doc("1", json!({"kind": "a"}))).await;
        col.seed(doc("2", json!({"kind": "b"}))).await;

        let found = col
            .execute_find(json!({"kind": "a"}), FindOptions::default())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
    }

    #[tokio::test]
    async fn test_find_sorts_skips_and_limits() {
        let col = posts();
        for (id, n) in [("1", 3), ("2", 1), ("3", 2), ("4", 5), ("5", 4)] {
            col.seed(doc(id, json!({"n": n}))).await;
        }

        let options = FindOptions {
            limit: Some(2),
            skip: Some(1),
            sort: Some(SortState {
                field: "n".to_string(),
                direction: -1,
            }),
        };
        let found = col.execute_find(json!({}), options).await.unwrap();
        let ns: Vec<_> = found.iter().map(|d| d.get("n").cloned()).collect();
        assert_eq!(ns, vec![Some(json!(4)), Some(json!(3))]);
    }

    #[tokio::test]
    async fn test_save_reports_missing_required_paths_by_field() {
        let col = MemoryCollection::new(MapSchema::new("posts")).require("title");
        let err = col.save(&doc("1", json!({}))).await.unwrap_err();
        match err {
            SaveError::Validation { errors } => {
                assert_eq!(errors.get("title"), Some(&"Path `title` is required.".to_string()));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(col.count_documents().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_upserts_by_id() {
        let col = posts();
        col.save(&doc("1", json!({"n": 1}))).await.unwrap();
        col.save(&doc("1", json!({"n": 2}))).await.unwrap();

        assert_eq!(col.count_documents().await.unwrap(), 1);
        let stored = col.find_by_id("1").await.unwrap().unwrap();
        assert_eq!(stored.get("n"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_ok() {
        let col = posts();
        assert!(col.delete_one("ghost").await.is_ok());
    }
}
