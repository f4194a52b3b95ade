use std::collections::HashMap;
use thiserror::Error;

/// Field-keyed validation messages, as surfaced back onto an edit form.
pub type FieldErrors = HashMap<String, String>;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("No document matches id '{0}'")]
    NotFound(String),

    #[error("Malformed payload: {0}")]
    MalformedInput(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, AdminError>;

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        AdminError::MalformedInput(err.to_string())
    }
}

/// Outcome of asking the store to persist a document. Validation failures
/// are recoverable and carry per-field messages; anything else is fatal
/// to the current request.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Document failed validation")]
    Validation { errors: FieldErrors },

    #[error("Store error: {0}")]
    Store(String),
}
