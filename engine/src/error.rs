//! Error types for the Spindle engine.

use thiserror::Error;

/// All possible errors from the Spindle engine.
///
/// These are local, field-level validation errors raised before any network
/// call. Envelope-shape mismatches are not errors; they degrade to empty
/// sequences (see [`crate::envelope`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("invalid value for field '{field}': {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

impl Error {
    /// The field the error describes.
    pub fn field(&self) -> &'static str {
        match self {
            Error::MissingRequiredField(field) => field,
            Error::InvalidField { field, .. } => field,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
