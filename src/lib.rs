// ============================================================================
// Habanero: headless admin backend for document collections
// ============================================================================
//
// Browse, create, edit and delete documents of arbitrary, schema-described
// collections without collection-specific code. The persistent store, HTTP
// routing, template rendering and authentication are external collaborators;
// this crate owns the dynamic mutation engine, the listing planner with its
// cookie-toggled sort, the session flash queue and the per-operation
// orchestration.

pub mod core;
pub mod document;
pub mod handler;
pub mod listing;
pub mod mutate;
pub mod schema;
pub mod session;
pub mod store;

// Re-export the working surface
pub use crate::core::{AdminError, FieldErrors, Result, SaveError};
pub use document::Document;
pub use handler::{
    DeleteOutcome, DocOutcome, DocResponse, DocumentHandler, JSON_CONTENT_KEY, JSON_FLAG_KEY,
    ListRequest, ListResponse, SUGGEST_LIMIT,
};
pub use listing::{ListQuery, ListingPage, PER_PAGE, SortCookie, SortState, next_sort, total_pages};
pub use mutate::{PendingEdit, apply_edits};
pub use schema::{CollectionSchema, MapSchema, PathType};
pub use session::{
    COOKIE_PREFIX, CRITERIA_COOKIE, Cookies, FlashKind, SORT_FIELD_COOKIE, Session,
};
pub use store::{Collection, FindOptions, FindQuery, MemoryCollection};
