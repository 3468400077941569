//! Shared helpers for the per-variant readers.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tarry_core::{Result, TarryError};

/// Read a variant's envelope; structural failures become `Malformed`.
pub(crate) fn envelope<T: DeserializeOwned>(family: &'static str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| TarryError::Malformed {
        family,
        cause: e.to_string(),
    })
}

/// Unwrap a required envelope field.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| TarryError::required(field))
}

/// Reject a zero where the field must be positive.
pub(crate) fn positive(value: Option<u32>, field: &str) -> Result<Option<u32>> {
    match value {
        Some(0) => Err(TarryError::invalid(field, "must be greater than zero")),
        other => Ok(other),
    }
}

/// Nest a failure from reading an embedded value under its family.
pub(crate) fn nested(family: &'static str, err: TarryError) -> TarryError {
    match err {
        TarryError::Malformed { .. } => err,
        other => TarryError::Malformed {
            family,
            cause: other.to_string(),
        },
    }
}
