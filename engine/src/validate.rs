//! Draft validation, applied before any network call.

use crate::entity::Record;
use crate::error::{Error, Result};

/// Validate a draft record ahead of submission.
///
/// Required: non-empty title, price greater than zero, stock greater than
/// zero. The first violation is returned with a field-describing message;
/// a failing draft must never reach the network.
pub fn validate_draft(record: &Record) -> Result<()> {
    if record.title.trim().is_empty() {
        return Err(Error::MissingRequiredField("title"));
    }
    if record.price.is_nan() || record.price <= 0.0 {
        return Err(Error::InvalidField {
            field: "price",
            reason: "must be greater than zero",
        });
    }
    if record.stock <= 0 {
        return Err(Error::InvalidField {
            field: "stock",
            reason: "must be greater than zero",
        });
    }
    Ok(())
}
