//! Flow and run classification enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of flow a wait may appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    /// Interactive messaging flows.
    Messaging,
    /// Messaging flows run on an offline client.
    MessagingOffline,
    /// IVR/voice flows.
    Voice,
}

impl FlowKind {
    /// All flow kinds.
    pub const ALL: [FlowKind; 3] = [Self::Messaging, Self::MessagingOffline, Self::Voice];

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Messaging => "messaging",
            Self::MessagingOffline => "messaging_offline",
            Self::Voice => "voice",
        }
    }

    /// Parse a flow kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "messaging" => Some(Self::Messaging),
            "messaging_offline" => Some(Self::MessagingOffline),
            "voice" => Some(Self::Voice),
            _ => None,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a run, restricted to what the wait/resume core reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Executing nodes.
    Active,
    /// Suspended at an activated wait.
    Waiting,
    /// Reached the end of the flow.
    Completed,
    /// Stopped by an error.
    Failed,
    /// Stopped because it or its wait expired.
    Expired,
}

impl RunStatus {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Waiting => "waiting",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Expired => "expired",
        }
    }

    /// Whether no further transitions are possible from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Expired)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What started the session a run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Started by hand (API, UI, another flow).
    Manual,
    /// Started by an inbound message.
    Msg,
    /// Started by an incoming call.
    Channel,
    /// Started by a campaign event.
    Campaign,
}

impl TriggerKind {
    /// Whether the trigger itself carried an inbound message.
    pub fn carries_msg(&self) -> bool {
        matches!(self, Self::Msg)
    }
}
