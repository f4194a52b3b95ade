//! Path-level type metadata for a collection.
//!
//! The schema itself is owned by an external metadata provider; the core
//! only ever asks one question of it: what kind of value lives at a given
//! dotted path. Paths the provider has never heard of answer `Unknown`
//! and are treated as scalars downstream.

use std::collections::HashMap;

/// Declared shape of the value at a document path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathType {
    Scalar,
    Array,
    Object,
    Unknown,
}

/// Read-only descriptor of a collection's field paths.
pub trait CollectionSchema: Send + Sync {
    fn name(&self) -> &str;

    /// Type tag for a dotted path. Absent paths are `Unknown`.
    fn path_type(&self, path: &str) -> PathType;
}

/// Map-backed schema, filled in by whoever owns collection metadata.
#[derive(Debug, Clone, Default)]
pub struct MapSchema {
    name: String,
    types: HashMap<String, PathType>,
}

impl MapSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: HashMap::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>, ty: PathType) -> Self {
        self.types.insert(path.into(), ty);
        self
    }
}

impl CollectionSchema for MapSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn path_type(&self, path: &str) -> PathType {
        self.types.get(path).copied().unwrap_or(PathType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_paths_answer_their_tag() {
        let schema = MapSchema::new("posts")
            .with_path("tags", PathType::Array)
            .with_path("title", PathType::Scalar);

        assert_eq!(schema.path_type("tags"), PathType::Array);
        assert_eq!(schema.path_type("title"), PathType::Scalar);
    }

    #[test]
    fn test_unknown_path_defaults_to_unknown() {
        let schema = MapSchema::new("posts");
        assert_eq!(schema.path_type("whatever"), PathType::Unknown);
    }
}
