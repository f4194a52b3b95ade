pub mod error;

pub use error::{AdminError, FieldErrors, Result, SaveError};
