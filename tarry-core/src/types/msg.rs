//! Payloads of the domain events that end a wait.

use super::MsgUuid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inbound message from a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgIn {
    /// Message identifier assigned by the channel layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<MsgUuid>,
    /// URN the message arrived from (any scheme).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
    /// Message text.
    #[serde(default)]
    pub text: String,
    /// Attachment references (`<content-type>:<url>`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    /// Identifier of the message on the external channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl MsgIn {
    /// Create a text message.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            uuid: None,
            urn: None,
            text: text.into(),
            attachments: Vec::new(),
            external_id: None,
        }
    }

    /// Set the message identifier.
    pub fn with_uuid(mut self, uuid: MsgUuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    /// Set the sender URN.
    pub fn with_urn(mut self, urn: impl Into<String>) -> Self {
        self.urn = Some(urn.into());
        self
    }

    /// Add an attachment.
    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachments.push(attachment.into());
        self
    }

    /// Set the external identifier.
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

/// Outcome of dialing a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialStatus {
    /// The call was answered.
    Answered,
    /// Nobody picked up before the dial limit.
    NoAnswer,
    /// The line was busy.
    Busy,
    /// The call could not be placed.
    Failed,
}

impl DialStatus {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::NoAnswer => "no_answer",
            Self::Busy => "busy",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a dial: how it ended and how long the call lasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dial {
    /// How the dial ended.
    pub status: DialStatus,
    /// Call duration in seconds (zero if never answered).
    pub duration: u32,
}

impl Dial {
    /// Create a dial outcome.
    pub fn new(status: DialStatus, duration: u32) -> Self {
        Self { status, duration }
    }
}
