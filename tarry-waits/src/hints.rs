//! Hints about the response a message wait expects.
//!
//! In offline messaging flows a hint is a requirement: the client should only
//! reply with media of that kind. Everywhere else it is advisory and channels
//! may ignore it.

use crate::decode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tarry_core::registry::ReadFn;
use tarry_core::{Result, TarryError};

/// What kind of response a message wait expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Hint {
    /// An image attachment.
    Image,
    /// An audio attachment.
    Audio,
    /// A video attachment.
    Video,
    /// A shared location.
    Location,
    /// A geographic point.
    Geo,
    /// A sequence of keypad digits.
    Digits {
        /// Number of digits to collect.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
        /// Key that ends collection early (e.g. `#`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        terminated_by: Option<String>,
    },
}

impl Hint {
    /// A digits hint with no constraints.
    pub fn digits() -> Self {
        Self::Digits {
            count: None,
            terminated_by: None,
        }
    }

    /// A digits hint collecting exactly `count` digits.
    pub fn fixed_digits(count: u32) -> Self {
        Self::Digits {
            count: Some(count),
            terminated_by: None,
        }
    }

    /// A digits hint ended by `key`.
    pub fn terminated_digits(key: impl Into<String>) -> Self {
        Self::Digits {
            count: None,
            terminated_by: Some(key.into()),
        }
    }

    /// The type tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Location => "location",
            Self::Geo => "geo",
            Self::Digits { .. } => "digits",
        }
    }
}

pub(crate) const READERS: &[(&str, ReadFn<Hint>)] = &[
    ("image", read_image),
    ("audio", read_audio),
    ("video", read_video),
    ("location", read_location),
    ("geo", read_geo),
    ("digits", read_digits),
];

fn read_image(_: Value) -> Result<Hint> {
    Ok(Hint::Image)
}

fn read_audio(_: Value) -> Result<Hint> {
    Ok(Hint::Audio)
}

fn read_video(_: Value) -> Result<Hint> {
    Ok(Hint::Video)
}

fn read_location(_: Value) -> Result<Hint> {
    Ok(Hint::Location)
}

fn read_geo(_: Value) -> Result<Hint> {
    Ok(Hint::Geo)
}

#[derive(Deserialize)]
struct DigitsEnvelope {
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    terminated_by: Option<String>,
}

fn read_digits(value: Value) -> Result<Hint> {
    let e: DigitsEnvelope = decode::envelope("hint", value)?;
    if e.count == Some(0) {
        return Err(TarryError::invalid("count", "must be greater than zero"));
    }
    Ok(Hint::Digits {
        count: e.count,
        terminated_by: e.terminated_by.filter(|key| !key.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn digits_encoding() {
        assert_eq!(
            serde_json::to_value(Hint::fixed_digits(4)).unwrap(),
            json!({"type": "digits", "count": 4})
        );
        assert_eq!(
            serde_json::to_value(Hint::terminated_digits("#")).unwrap(),
            json!({"type": "digits", "terminated_by": "#"})
        );
        assert_eq!(
            serde_json::to_value(Hint::Image).unwrap(),
            json!({"type": "image"})
        );
    }

    #[test]
    fn digits_reader_validates_count() {
        let err = read_digits(json!({"type": "digits", "count": 0})).unwrap_err();
        assert_eq!(err.to_string(), "field 'count' must be greater than zero");

        assert_eq!(
            read_digits(json!({"type": "digits", "terminated_by": ""})).unwrap(),
            Hint::digits()
        );
    }

    #[test]
    fn type_names_match_tags() {
        for (tag, reader) in READERS {
            let hint = reader(json!({"type": tag})).unwrap();
            assert_eq!(hint.type_name(), *tag);
        }
    }
}
