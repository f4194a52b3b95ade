//! Per-operation orchestration over one collection resource.
//!
//! Each handler call reads its inputs once, runs at most one mutating
//! store call, and routes the result into the response model or the
//! session flash queue. Outcomes are transport-free: the HTTP layer
//! turns `Redirect` into a 3xx and `Rerender` into a template render.

use crate::core::{AdminError, FieldErrors, Result};
use crate::core::SaveError;
use crate::document::Document;
use crate::listing::{ListQuery, ListingPage, PER_PAGE, SortCookie, SortState, next_sort, total_pages};
use crate::mutate::{PendingEdit, apply_edits};
use crate::session::{CRITERIA_COOKIE, Cookies, FlashKind, SORT_FIELD_COOKIE, Session};
use crate::store::Collection;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// Upper bound on typeahead results.
pub const SUGGEST_LIMIT: i64 = 100;

/// Reserved body key flagging a JSON-encoded submission.
pub const JSON_FLAG_KEY: &str = "_is_json";
/// Reserved body key holding the JSON payload when the flag is set.
pub const JSON_CONTENT_KEY: &str = "_form_content";

const MISSING_DOC_MESSAGE: &str = "It doesn't look like there is a document with that id.";

/// Listing request surface: query parameters plus the cookies the client
/// sent.
#[derive(Debug, Default)]
pub struct ListRequest {
    pub page: Option<i64>,
    pub sort_field: Option<String>,
    pub criteria: Option<String>,
    pub cookies: Cookies,
}

#[derive(Debug)]
pub struct ListResponse {
    pub listing: ListingPage,
    /// Sort applied to this page, for the view to mark the active column.
    pub sort: Option<SortState>,
    /// Next-request sort parameters for column-header links.
    pub sort_links: Option<SortCookie>,
    /// Cookies to flush into the response.
    pub cookies: Cookies,
}

/// Edit-form model for a single document read.
#[derive(Debug)]
pub struct DocResponse {
    /// Absent when the id matched nothing; the form still renders,
    /// bound to no document.
    pub document: Option<Document>,
    pub errors: FieldErrors,
}

/// Result of a create or update.
#[derive(Debug)]
pub enum DocOutcome {
    Redirect(String),
    Rerender {
        document: Option<Document>,
        errors: FieldErrors,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Redirect(String),
    /// Store failure: logged, nothing queued for the user.
    Failed,
}

/// Orchestrates List/Read/Update/Create/Delete/Suggest against one
/// collection capability.
pub struct DocumentHandler {
    collection: Arc<dyn Collection>,
    app_path: String,
}

impl DocumentHandler {
    pub fn new(collection: Arc<dyn Collection>, app_path: impl Into<String>) -> Self {
        Self {
            collection,
            app_path: app_path.into(),
        }
    }

    fn listing_path(&self) -> String {
        format!("{}/{}", self.app_path, self.collection.name())
    }

    /// One bounded, sorted page plus an independent count. The two reads
    /// are unsynchronized; a concurrent mutation can skew total_pages
    /// against the item set.
    pub async fn list(&self, request: ListRequest) -> Result<ListResponse> {
        let query = ListQuery::plan(request.page);
        let (sort, sort_links) = next_sort(
            request.sort_field.as_deref(),
            request.criteria.as_deref(),
            request.cookies.read(SORT_FIELD_COOKIE),
            request.cookies.read(CRITERIA_COOKIE),
        );

        let mut cookies = Cookies::new();
        if let Some(links) = &sort_links {
            cookies.write(SORT_FIELD_COOKIE, &links.field);
            cookies.write(CRITERIA_COOKIE, &links.criteria.to_string());
        }

        let items = self
            .collection
            .find(JsonValue::Object(Map::new()))
            .limit(query.limit)
            .skip(query.skip)
            .sort(sort.clone())
            .exec()
            .await?;
        let count = self.collection.count_documents().await?;

        Ok(ListResponse {
            listing: ListingPage {
                items,
                page: query.page,
                per_page: PER_PAGE,
                total_pages: total_pages(count),
            },
            sort,
            sort_links,
            cookies,
        })
    }

    /// Fetch one document for the edit form. A missing id queues an
    /// error flash but still yields a form response bound to nothing.
    pub async fn read(&self, session: &mut Session, id: &str) -> Result<DocResponse> {
        let document = self.collection.find_by_id(id).await?;
        if document.is_none() {
            session.flash(FlashKind::Error, MISSING_DOC_MESSAGE);
        }
        Ok(DocResponse {
            document,
            errors: FieldErrors::new(),
        })
    }

    /// Mutate an existing document from a submitted body and persist it.
    pub async fn update(
        &self,
        session: &mut Session,
        id: &str,
        body: PendingEdit,
    ) -> Result<DocOutcome> {
        let Some(mut document) = self.collection.find_by_id(id).await? else {
            session.flash(FlashKind::Error, MISSING_DOC_MESSAGE);
            return Ok(DocOutcome::Rerender {
                document: None,
                errors: FieldErrors::new(),
            });
        };

        let (edits, is_json) = extract_edits(body)?;
        apply_edits(&mut document, self.collection.schema(), &edits, is_json);

        match self.collection.save(&document).await {
            Ok(_) => Ok(DocOutcome::Redirect(self.listing_path())),
            Err(SaveError::Validation { errors }) => {
                log::warn!("error saving document {}: {errors:?}", document.id);
                Ok(DocOutcome::Rerender {
                    document: Some(document),
                    errors,
                })
            }
            // only validation failures are recoverable into a re-render
            Err(SaveError::Store(message)) => Err(AdminError::Store(message)),
        }
    }

    /// Instantiate an empty document, run the same extraction/mutation
    /// sequence as update, persist, and redirect to the new id.
    pub async fn create(&self, session: &mut Session, body: PendingEdit) -> Result<DocOutcome> {
        let mut document = Document::new(self.collection.name());
        let (edits, is_json) = extract_edits(body)?;
        apply_edits(&mut document, self.collection.schema(), &edits, is_json);

        match self.collection.save(&document).await {
            Ok(saved) => {
                session.flash(
                    FlashKind::Success,
                    format!("{} created successfully!", self.collection.name()),
                );
                Ok(DocOutcome::Redirect(saved.id))
            }
            Err(SaveError::Validation { errors }) => {
                session.flash(
                    FlashKind::Error,
                    "There was a problem saving the document!  Try again.",
                );
                Ok(DocOutcome::Rerender {
                    document: Some(document),
                    errors,
                })
            }
            Err(SaveError::Store(message)) => Err(AdminError::Store(message)),
        }
    }

    /// Remove by id. Success queues a flash and redirects; a store
    /// failure is only logged and the user sees nothing.
    pub async fn delete(&self, session: &mut Session, id: &str) -> DeleteOutcome {
        match self.collection.delete_one(id).await {
            Ok(()) => {
                session.flash(FlashKind::Success, format!("Doc {id} deleted successfully!"));
                DeleteOutcome::Redirect(self.listing_path())
            }
            Err(err) => {
                log::error!("error deleting document {id}: {err}");
                DeleteOutcome::Failed
            }
        }
    }

    /// Typeahead: raw filter, no path coercion, no sort, capped result.
    pub async fn suggest(&self, filter: JsonValue) -> Result<Vec<Document>> {
        self.collection.find(filter).limit(SUGGEST_LIMIT).exec().await
    }
}

/// Split a submitted body into the edit map and the encoding flag.
///
/// The reserved flag key is stripped first. A JSON-encoded submission
/// replaces the body with the parsed `_form_content` payload; a parse
/// failure is fatal to the request.
fn extract_edits(mut body: PendingEdit) -> Result<(PendingEdit, bool)> {
    // shift_remove keeps the remaining edits in submission order
    let is_json = body
        .shift_remove(JSON_FLAG_KEY)
        .is_some_and(|flag| is_truthy(&flag));
    if !is_json {
        return Ok((body, false));
    }

    let content = body
        .shift_remove(JSON_CONTENT_KEY)
        .ok_or_else(|| AdminError::MalformedInput(format!("missing {JSON_CONTENT_KEY}")))?;
    let raw = content
        .as_str()
        .ok_or_else(|| AdminError::MalformedInput(format!("{JSON_CONTENT_KEY} must be a string")))?;
    match serde_json::from_str::<JsonValue>(raw)? {
        JsonValue::Object(edits) => Ok((edits, true)),
        _ => Err(AdminError::MalformedInput(
            "expected a JSON object payload".to_string(),
        )),
    }
}

/// Loose truthiness for the form-transported flag, which may arrive as a
/// bool or as a string.
fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        JsonValue::String(s) => !s.is_empty(),
        _ => true,
    }
}
