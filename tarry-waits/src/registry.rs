//! The standard registries and decode entry points.
//!
//! Each family gets one [`TypeRegistry`] built from the static reader table
//! of its module. They are built on first use and shared for the life of the
//! process.

use crate::activated::{self, ActivatedWait};
use crate::decode;
use crate::hints::{self, Hint};
use crate::resumes::{self, Resume};
use crate::waits::{self, Wait};
use once_cell::sync::Lazy;
use serde_json::Value;
use tarry_core::{Result, TypeRegistry};

/// One registry per persisted family.
#[derive(Debug)]
pub struct Registries {
    /// Wait declarations.
    pub waits: TypeRegistry<Wait>,
    /// Activated waits.
    pub activated: TypeRegistry<ActivatedWait>,
    /// Resumes.
    pub resumes: TypeRegistry<Resume>,
    /// Hints.
    pub hints: TypeRegistry<Hint>,
}

impl Registries {
    /// Build registries holding every built-in type.
    ///
    /// # Errors
    /// Returns [`tarry_core::TarryError::DuplicateType`] if a table repeats a tag.
    pub fn standard() -> Result<Self> {
        Ok(Self {
            waits: TypeRegistry::from_table("wait", waits::READERS)?,
            activated: TypeRegistry::from_table("activated wait", activated::READERS)?,
            resumes: TypeRegistry::from_table("resume", resumes::READERS)?,
            hints: TypeRegistry::from_table("hint", hints::READERS)?,
        })
    }

    /// `(family, tags)` for every registry, in a fixed order.
    pub fn families(&self) -> [(&'static str, Vec<&'static str>); 4] {
        [
            (self.waits.family(), self.waits.tags()),
            (self.activated.family(), self.activated.tags()),
            (self.resumes.family(), self.resumes.tags()),
            (self.hints.family(), self.hints.tags()),
        ]
    }
}

static STANDARD: Lazy<Result<Registries>> = Lazy::new(|| {
    let registries = Registries::standard();
    if let Err(e) = &registries {
        tracing::error!(error = %e, "Failed to build standard registries");
    }
    registries
});

/// The process-wide standard registries.
///
/// # Errors
/// Returns the error building them failed with, if it did.
pub fn standard() -> Result<&'static Registries> {
    STANDARD.as_ref().map_err(Clone::clone)
}

fn logged<T>(family: &'static str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::debug!(family, error = %e, "Decode failed");
    }
    result
}

/// Decode a wait from JSON bytes.
///
/// # Errors
/// Returns the decode error for unknown types or invalid fields.
pub fn read_wait(data: &[u8]) -> Result<Wait> {
    logged("wait", standard()?.waits.read(data))
}

/// Decode a wait from a JSON value.
///
/// # Errors
/// See [`read_wait`].
pub fn read_wait_value(value: Value) -> Result<Wait> {
    logged("wait", standard()?.waits.read_value(value))
}

/// Decode an activated wait from JSON bytes.
///
/// # Errors
/// Returns the decode error for unknown types or invalid fields.
pub fn read_activated_wait(data: &[u8]) -> Result<ActivatedWait> {
    logged("activated wait", standard()?.activated.read(data))
}

/// Decode an activated wait from a JSON value.
///
/// # Errors
/// See [`read_activated_wait`].
pub fn read_activated_wait_value(value: Value) -> Result<ActivatedWait> {
    logged("activated wait", standard()?.activated.read_value(value))
}

/// Decode a resume from JSON bytes.
///
/// # Errors
/// Returns the decode error for unknown types or invalid fields.
pub fn read_resume(data: &[u8]) -> Result<Resume> {
    logged("resume", standard()?.resumes.read(data))
}

/// Decode a resume from a JSON value.
///
/// # Errors
/// See [`read_resume`].
pub fn read_resume_value(value: Value) -> Result<Resume> {
    logged("resume", standard()?.resumes.read_value(value))
}

/// Decode a hint from JSON bytes.
///
/// # Errors
/// Returns the decode error for unknown types or invalid fields.
pub fn read_hint(data: &[u8]) -> Result<Hint> {
    logged("hint", standard()?.hints.read(data))
}

/// Decode a hint from a JSON value.
///
/// # Errors
/// See [`read_hint`].
pub fn read_hint_value(value: Value) -> Result<Hint> {
    logged("hint", standard()?.hints.read_value(value))
}

/// Decode a hint embedded in another value, nesting failures under `hint`.
pub(crate) fn read_embedded_hint(value: Value) -> Result<Hint> {
    read_hint_value(value).map_err(|e| decode::nested("hint", e))
}
