//! The store capability the core talks through.
//!
//! The persistent store is an external collaborator; the core only sees
//! this trait plus the query builder it hands out. `memory` ships a
//! self-contained implementation for tests and embedded use.

pub mod memory;

use crate::core::{Result, SaveError};
use crate::document::Document;
use crate::listing::SortState;
use crate::schema::CollectionSchema;
use async_trait::async_trait;
use serde_json::Value as JsonValue;

pub use memory::MemoryCollection;

/// Bounds and ordering for one find call.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    pub sort: Option<SortState>,
}

/// A named grouping of documents sharing one schema descriptor.
///
/// Each request issues at most one mutating call and never retries;
/// a failed save or delete is reported once. No concurrency control is
/// provided between concurrent edits of one document: the last completed
/// write wins.
#[async_trait]
pub trait Collection: Send + Sync {
    fn name(&self) -> &str;

    /// Path-level type metadata for this collection's documents.
    fn schema(&self) -> &dyn CollectionSchema;

    async fn execute_find(&self, filter: JsonValue, options: FindOptions)
    -> Result<Vec<Document>>;

    async fn count_documents(&self) -> Result<u64>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>>;

    /// Persist (insert or replace by id). Validation failures carry
    /// field-keyed messages.
    async fn save(&self, document: &Document) -> std::result::Result<Document, SaveError>;

    async fn delete_one(&self, id: &str) -> Result<()>;
}

impl dyn Collection {
    /// Start a query against this collection.
    pub fn find(&self, filter: JsonValue) -> FindQuery<'_> {
        FindQuery::new(self, filter)
    }
}

/// Builder over [`Collection::execute_find`].
pub struct FindQuery<'a> {
    collection: &'a dyn Collection,
    filter: JsonValue,
    options: FindOptions,
}

impl<'a> FindQuery<'a> {
    pub fn new(collection: &'a dyn Collection, filter: JsonValue) -> Self {
        Self {
            collection,
            filter,
            options: FindOptions::default(),
        }
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.options.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: i64) -> Self {
        self.options.skip = Some(skip);
        self
    }

    pub fn sort(mut self, sort: Option<SortState>) -> Self {
        self.options.sort = sort;
        self
    }

    pub async fn exec(self) -> Result<Vec<Document>> {
        self.collection.execute_find(self.filter, self.options).await
    }
}
