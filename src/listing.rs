//! Listing plans: pagination and the cookie-toggled sort state.
//!
//! The sort toggle is deliberately a pure function of the request
//! parameters and the token the client carried over from the previous
//! response, so it is testable without any HTTP machinery. The client
//! never learns the current direction; re-clicking the same column link
//! replays the persisted (opposite) criteria and the listing alternates
//! ascending/descending with no server-side session state.

use crate::document::Document;
use serde::Serialize;

/// Fixed page size for collection listings.
pub const PER_PAGE: i64 = 10;

/// Sort applied to the current listing query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub field: String,
    /// `1` ascending, `-1` descending.
    pub direction: i64,
}

/// Token persisted on the client for the next request. Holds the
/// *opposite* of the direction just used; callers must not treat it as
/// the currently displayed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortCookie {
    pub field: String,
    pub criteria: i64,
}

/// Compute the sort for this request and the token to persist for the
/// next one. Query parameters win over the cookie fallback; an empty or
/// unparsable criteria string means ascending. No field means no sort
/// and nothing persisted.
pub fn next_sort(
    query_field: Option<&str>,
    query_criteria: Option<&str>,
    cookie_field: Option<&str>,
    cookie_criteria: Option<&str>,
) -> (Option<SortState>, Option<SortCookie>) {
    let field = first_non_empty(query_field, cookie_field);
    let raw = first_non_empty(query_criteria, cookie_criteria);

    let direction = match raw {
        None => 1,
        // toggle: negate what the client handed back
        Some(raw) => raw.parse::<i64>().map(|n| -n).unwrap_or(1),
    };

    match field {
        Some(field) => (
            Some(SortState {
                field: field.to_string(),
                direction,
            }),
            Some(SortCookie {
                field: field.to_string(),
                criteria: -direction,
            }),
        ),
        None => (None, None),
    }
}

fn first_non_empty<'a>(primary: Option<&'a str>, fallback: Option<&'a str>) -> Option<&'a str> {
    primary
        .filter(|s| !s.is_empty())
        .or_else(|| fallback.filter(|s| !s.is_empty()))
}

/// Bounds for one listing query: page index plus the skip/limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub page: i64,
    pub skip: i64,
    pub limit: i64,
}

impl ListQuery {
    /// Non-positive or absent page parameters clamp to page 0.
    pub fn plan(page_param: Option<i64>) -> Self {
        let page = match page_param {
            Some(p) if p > 0 => p,
            _ => 0,
        };
        Self {
            page,
            skip: PER_PAGE * page,
            limit: PER_PAGE,
        }
    }
}

/// Page count as the store reports it: `count / PER_PAGE`, no ceiling.
/// A fractional value is handed to the presentation layer as-is.
pub fn total_pages(count: u64) -> f64 {
    count as f64 / PER_PAGE as f64
}

/// One page of a collection listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub items: Vec<Document>,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: f64,
}
