//! Tag-dispatched type registry.
//!
//! Every persisted family (waits, activated waits, resumes, hints) is encoded
//! as a JSON object whose `type` field names the variant. A [`TypeRegistry`]
//! maps those tags to reader functions for one family.
//!
//! Registries are populated once while the process boots, usually from a
//! static table via [`TypeRegistry::from_table`], and are only read after
//! that. Registration takes `&mut self`, so a registry that has been placed in
//! a shared static can no longer change.

use crate::error::{Result, TarryError};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// The discriminator field every family is tagged with.
pub const TYPE_FIELD: &str = "type";

/// Reads one variant of a family from its decoded JSON object.
pub type ReadFn<T> = fn(Value) -> Result<T>;

/// Registry of readers for one family of tagged types.
pub struct TypeRegistry<T> {
    /// Family name used in error messages (e.g. "wait").
    family: &'static str,
    /// Readers by type tag.
    readers: HashMap<&'static str, ReadFn<T>>,
}

impl<T> TypeRegistry<T> {
    /// Create an empty registry for `family`.
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            readers: HashMap::new(),
        }
    }

    /// Create a registry from a static `(tag, reader)` table.
    ///
    /// # Errors
    /// Returns [`TarryError::DuplicateType`] if the table repeats a tag.
    pub fn from_table(family: &'static str, table: &[(&'static str, ReadFn<T>)]) -> Result<Self> {
        let mut registry = Self::new(family);
        for (tag, reader) in table {
            registry.register(tag, *reader)?;
        }
        Ok(registry)
    }

    /// Register the reader for a tag.
    ///
    /// # Errors
    /// Returns [`TarryError::DuplicateType`] if the tag already has a reader.
    pub fn register(&mut self, tag: &'static str, reader: ReadFn<T>) -> Result<()> {
        if self.readers.contains_key(tag) {
            return Err(TarryError::DuplicateType {
                family: self.family,
                tag: tag.to_string(),
            });
        }
        self.readers.insert(tag, reader);
        Ok(())
    }

    /// The family this registry decodes.
    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Whether a reader is registered for `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.readers.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.readers.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// Decode a value from JSON bytes.
    ///
    /// # Errors
    /// - [`TarryError::Malformed`] if the bytes are not JSON
    /// - [`TarryError::MissingTypeField`] if there is no usable `type` field
    /// - [`TarryError::UnknownType`] if the tag is not registered
    /// - whatever the variant's reader returns when validating fields
    pub fn read(&self, data: &[u8]) -> Result<T> {
        let value: Value = serde_json::from_slice(data).map_err(|e| TarryError::Malformed {
            family: self.family,
            cause: e.to_string(),
        })?;
        self.read_value(value)
    }

    /// Decode a value from an already-parsed JSON value.
    ///
    /// # Errors
    /// See [`TypeRegistry::read`].
    pub fn read_value(&self, value: Value) -> Result<T> {
        let tag = read_type(&value)?;
        let reader = self
            .readers
            .get(tag)
            .ok_or_else(|| TarryError::UnknownType(tag.to_string()))?;

        tracing::trace!(family = self.family, tag, "Dispatching decode by type tag");
        reader(value)
    }
}

impl<T> fmt::Debug for TypeRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("family", &self.family)
            .field("tags", &self.tags())
            .finish()
    }
}

/// Extract the `type` discriminator from a JSON value.
///
/// # Errors
/// Returns [`TarryError::MissingTypeField`] if the value is not an object, or
/// its `type` field is absent, not a string, or empty.
pub fn read_type(value: &Value) -> Result<&str> {
    match value.get(TYPE_FIELD).and_then(Value::as_str) {
        Some(tag) if !tag.is_empty() => Ok(tag),
        _ => Err(TarryError::MissingTypeField),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    enum Shape {
        Circle(u64),
        Square,
    }

    fn read_circle(value: Value) -> Result<Shape> {
        value
            .get("radius")
            .and_then(Value::as_u64)
            .map(Shape::Circle)
            .ok_or_else(|| TarryError::required("radius"))
    }

    fn read_square(_: Value) -> Result<Shape> {
        Ok(Shape::Square)
    }

    fn shapes() -> TypeRegistry<Shape> {
        TypeRegistry::from_table(
            "shape",
            &[
                ("circle", read_circle as ReadFn<Shape>),
                ("square", read_square),
            ],
        )
        .unwrap()
    }

    #[test]
    fn dispatches_by_tag() {
        let registry = shapes();
        assert_eq!(
            registry.read(br#"{"type": "circle", "radius": 3}"#).unwrap(),
            Shape::Circle(3)
        );
        assert_eq!(
            registry.read_value(json!({"type": "square"})).unwrap(),
            Shape::Square
        );
    }

    #[test]
    fn missing_and_unknown_types() {
        let registry = shapes();
        assert_eq!(
            registry.read(br#"{"foo": "bar"}"#).unwrap_err().to_string(),
            "field 'type' is required"
        );
        assert_eq!(
            registry.read(br#"{"type": ""}"#).unwrap_err(),
            TarryError::MissingTypeField
        );
        assert_eq!(
            registry.read(br#"{"type": 5}"#).unwrap_err(),
            TarryError::MissingTypeField
        );
        assert_eq!(
            registry
                .read(br#"{"type": "do_the_foo"}"#)
                .unwrap_err()
                .to_string(),
            "unknown type: 'do_the_foo'"
        );
    }

    #[test]
    fn reader_errors_surface() {
        let registry = shapes();
        assert_eq!(
            registry.read(br#"{"type": "circle"}"#).unwrap_err().to_string(),
            "field 'radius' is required"
        );
    }

    #[test]
    fn malformed_json() {
        let err = shapes().read(b"{not json").unwrap_err();
        assert!(matches!(err, TarryError::Malformed { family: "shape", .. }));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = shapes();
        let err = registry.register("square", read_square).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type 'square' is already registered for shape"
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn tags_are_sorted() {
        assert_eq!(shapes().tags(), vec!["circle", "square"]);
    }
}
