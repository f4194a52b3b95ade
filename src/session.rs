//! Per-session state threaded through a request: the flash queue and the
//! cookie name/validation rules.
//!
//! Flash messages are appended by the core and drained by the
//! presentation layer; the core never clears them. Cookies are read once
//! and written once per request by the transport; the core only decides
//! what a trustworthy value looks like.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

/// Kind of a one-shot user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// Session-scoped state. Created at session start by the transport;
/// lives across requests until the session ends.
#[derive(Debug, Default)]
pub struct Session {
    messages: HashMap<FlashKind, Vec<String>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notice. No size bound, no dedup, no expiry.
    pub fn flash(&mut self, kind: FlashKind, text: impl Into<String>) {
        self.messages.entry(kind).or_default().push(text.into());
    }

    pub fn messages(&self, kind: FlashKind) -> &[String] {
        self.messages.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Presentation-layer hook: take and clear one kind of notice.
    pub fn drain(&mut self, kind: FlashKind) -> Vec<String> {
        self.messages.remove(&kind).unwrap_or_default()
    }
}

pub const COOKIE_PREFIX: &str = "habanero_";
pub const SORT_FIELD_COOKIE: &str = "sortField";
pub const CRITERIA_COOKIE: &str = "criteria";

lazy_static! {
    static ref COOKIE_VALUE: Regex = Regex::new(r"^[a-zA-Z0-9_.\-]+$").unwrap();
}

/// One direction of cookie traffic. The transport seeds an incoming jar
/// with whatever the client sent and flushes an outgoing jar into the
/// response headers.
#[derive(Debug, Clone, Default)]
pub struct Cookies {
    values: HashMap<String, String>,
}

impl Cookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport side: store a cookie exactly as received, full name.
    pub fn insert_raw(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Read a prefixed cookie. Values failing the allow-list pattern are
    /// treated as absent.
    pub fn read(&self, name: &str) -> Option<&str> {
        self.values
            .get(&format!("{COOKIE_PREFIX}{name}"))
            .map(String::as_str)
            .filter(|value| COOKIE_VALUE.is_match(value))
    }

    /// Queue a prefixed cookie for the response. Empty values are not
    /// written; the literal "0" is.
    pub fn write(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        self.values
            .insert(format!("{COOKIE_PREFIX}{name}"), value.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
