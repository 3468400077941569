//! Error types for Tarry.
//!
//! Decode errors, protocol errors (a resume routed to the wrong wait) and
//! configuration errors share one enum so that callers can match on a single
//! type. Every variant carries a stable code (see [`TarryError::code`]) but the
//! display text is kept free of it: the exact messages are part of the
//! persisted-data contract and are compared verbatim by callers.

use thiserror::Error;

/// The main error type for Tarry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TarryError {
    // =========================================================================
    // Decode Errors (T001-T099)
    // =========================================================================
    /// The `type` discriminator is absent, empty or not a string.
    #[error("field 'type' is required")]
    MissingTypeField,

    /// The discriminator names a type that no registry entry exists for.
    #[error("unknown type: '{0}'")]
    UnknownType(
        /// The unrecognized type tag.
        String,
    ),

    /// A required field is absent or a present field is malformed.
    #[error("field '{field}' {reason}")]
    Validation {
        /// Dotted path of the offending field (e.g. `timeout.seconds`).
        field: String,
        /// What is wrong with it (e.g. `is required`).
        reason: String,
    },

    /// The encoded data could not be read into the family's envelope at all.
    #[error("unable to read {family}: {cause}")]
    Malformed {
        /// The family being decoded (`wait`, `resume`, ...).
        family: &'static str,
        /// Underlying decoder message.
        cause: String,
    },

    // =========================================================================
    // Registry Errors (T100-T199)
    // =========================================================================
    /// A second constructor was registered for a tag.
    #[error("type '{tag}' is already registered for {family}")]
    DuplicateType {
        /// The registry family.
        family: &'static str,
        /// The tag registered twice.
        tag: String,
    },

    // =========================================================================
    // Protocol Errors (T200-T299)
    // =========================================================================
    /// `end` was called with a resume the wait does not accept.
    #[error("can't end a wait of type '{wait_type}' with a resume of type '{resume_type}'")]
    ResumeTypeMismatch {
        /// Type of the wait being ended.
        wait_type: String,
        /// Type of the offending resume.
        resume_type: String,
    },

    /// A `wait_timeout` resume was delivered to a wait without a timeout.
    #[error(
        "can't end a wait of type '{wait_type}' with a resume of type 'wait_timeout' as it has no timeout"
    )]
    TimeoutNotConfigured {
        /// Type of the wait being ended.
        wait_type: String,
    },

    /// A wait was placed in a flow kind it cannot run in.
    #[error("wait of type '{wait_type}' is not allowed in a flow of type '{flow_kind}'")]
    WaitNotAllowed {
        /// Type of the wait.
        wait_type: String,
        /// Kind of the flow it was found in.
        flow_kind: String,
    },

    // =========================================================================
    // Evaluation Errors (T300-T399)
    // =========================================================================
    /// Text could not be turned into a telephony URN.
    #[error("unable to parse '{value}' as a phone URN: {cause}")]
    InvalidUrn {
        /// The text that was parsed.
        value: String,
        /// Why parsing failed.
        cause: String,
    },

    // =========================================================================
    // Serialization / Configuration Errors (T800-T899)
    // =========================================================================
    /// Encoding a value failed.
    #[error("serialization error: {0}")]
    Serialization(
        /// The serializer's message.
        String,
    ),

    /// A configuration value is invalid.
    #[error("invalid configuration '{field}': {cause}")]
    Config {
        /// The configuration field.
        field: String,
        /// Why the value is rejected.
        cause: String,
    },
}

impl TarryError {
    /// Shorthand for a missing required field.
    pub fn required(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: "is required".to_string(),
        }
    }

    /// Shorthand for a present but malformed field.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code (e.g., "T001").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingTypeField => "T001",
            Self::UnknownType(_) => "T002",
            Self::Validation { .. } => "T003",
            Self::Malformed { .. } => "T004",
            Self::DuplicateType { .. } => "T101",
            Self::ResumeTypeMismatch { .. } => "T201",
            Self::TimeoutNotConfigured { .. } => "T202",
            Self::WaitNotAllowed { .. } => "T203",
            Self::InvalidUrn { .. } => "T301",
            Self::Serialization(_) => "T801",
            Self::Config { .. } => "T802",
        }
    }

    /// Check if this error was raised while decoding persisted data.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::MissingTypeField
                | Self::UnknownType(_)
                | Self::Validation { .. }
                | Self::Malformed { .. }
        )
    }

    /// Check if this error signals a resume delivered to the wrong wait.
    ///
    /// These are caller bugs rather than authoring mistakes; the caller decides
    /// whether to drop the resume or surface it.
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::ResumeTypeMismatch { .. } | Self::TimeoutNotConfigured { .. }
        )
    }
}

impl From<serde_json::Error> for TarryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using `TarryError`.
pub type Result<T> = std::result::Result<T, TarryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_correct() {
        assert_eq!(TarryError::MissingTypeField.code(), "T001");
        assert_eq!(TarryError::UnknownType("x".into()).code(), "T002");
        assert_eq!(
            TarryError::TimeoutNotConfigured {
                wait_type: "msg".into()
            }
            .code(),
            "T202"
        );
    }

    #[test]
    fn decode_error_display() {
        assert_eq!(
            TarryError::MissingTypeField.to_string(),
            "field 'type' is required"
        );
        assert_eq!(
            TarryError::UnknownType("do_the_foo".into()).to_string(),
            "unknown type: 'do_the_foo'"
        );
        assert_eq!(
            TarryError::required("phone").to_string(),
            "field 'phone' is required"
        );
    }

    #[test]
    fn mismatch_display_names_both_tags() {
        let err = TarryError::ResumeTypeMismatch {
            wait_type: "dial".into(),
            resume_type: "wait_timeout".into(),
        };
        assert_eq!(
            err.to_string(),
            "can't end a wait of type 'dial' with a resume of type 'wait_timeout'"
        );
    }

    #[test]
    fn classification() {
        assert!(TarryError::MissingTypeField.is_decode_error());
        assert!(!TarryError::MissingTypeField.is_protocol_error());

        let err = TarryError::TimeoutNotConfigured {
            wait_type: "msg".into(),
        };
        assert!(err.is_protocol_error());
        assert!(!err.is_decode_error());
    }
}
