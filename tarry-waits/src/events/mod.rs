//! Flow events emitted while waits begin and resumes are applied.
//!
//! Events are the in-band record of what happened to a run and are persisted
//! with it. They serialize as JSON objects tagged by `type`, each with a
//! `created_on` timestamp.

mod log;

pub use log::{EventLog, EventSink, FnSink, from_fn};

use crate::hints::Hint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tarry_core::types::{Dial, MsgIn, RunUuid, Urn};

/// An event in a run's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A message wait activated.
    MsgWait(MsgWaitEvent),
    /// A dial wait activated.
    DialWait(DialWaitEvent),
    /// A redirect wait activated.
    RedirectWait(RedirectWaitEvent),
    /// A non-fatal problem occurred.
    Error(ErrorEvent),
    /// A message was received.
    MsgReceived(MsgReceivedEvent),
    /// A dial ended.
    DialEnded(DialEndedEvent),
    /// A redirect ended.
    RedirectEnded(RedirectEndedEvent),
    /// A wait's timeout elapsed.
    WaitTimedOut(WaitTimedOutEvent),
    /// A wait expired without being answered.
    WaitExpired(WaitExpiredEvent),
    /// A run expired.
    RunExpired(RunExpiredEvent),
}

impl Event {
    /// The type tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::MsgWait(_) => "msg_wait",
            Self::DialWait(_) => "dial_wait",
            Self::RedirectWait(_) => "redirect_wait",
            Self::Error(_) => "error",
            Self::MsgReceived(_) => "msg_received",
            Self::DialEnded(_) => "dial_ended",
            Self::RedirectEnded(_) => "redirect_ended",
            Self::WaitTimedOut(_) => "wait_timed_out",
            Self::WaitExpired(_) => "wait_expired",
            Self::RunExpired(_) => "run_expired",
        }
    }

    /// When the event was created.
    pub fn created_on(&self) -> DateTime<Utc> {
        match self {
            Self::MsgWait(e) => e.created_on,
            Self::DialWait(e) => e.created_on,
            Self::RedirectWait(e) => e.created_on,
            Self::Error(e) => e.created_on,
            Self::MsgReceived(e) => e.created_on,
            Self::DialEnded(e) => e.created_on,
            Self::RedirectEnded(e) => e.created_on,
            Self::WaitTimedOut(e) => e.created_on,
            Self::WaitExpired(e) => e.created_on,
            Self::RunExpired(e) => e.created_on,
        }
    }

    /// An error event with the given text.
    pub fn error(text: impl Into<String>) -> Self {
        Self::Error(ErrorEvent {
            created_on: Utc::now(),
            text: text.into(),
        })
    }
}

/// A message wait activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgWaitEvent {
    /// When the wait activated.
    pub created_on: DateTime<Utc>,
    /// Seconds until the wait times out, if it has a timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,
    /// When the run expires if nothing arrives.
    pub expires_on: DateTime<Utc>,
    /// Expected response media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<Hint>,
}

/// A dial wait activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialWaitEvent {
    /// When the wait activated.
    pub created_on: DateTime<Utc>,
    /// The number being dialed.
    pub urn: Urn,
    /// Seconds to wait for an answer.
    pub dial_limit_seconds: u32,
    /// Maximum call length in seconds.
    pub call_limit_seconds: u32,
    /// When the run expires if the dial never reports back.
    pub expires_on: DateTime<Utc>,
}

/// A redirect wait activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectWaitEvent {
    /// When the wait activated.
    pub created_on: DateTime<Utc>,
}

/// A non-fatal problem, such as a template that failed to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// When the problem occurred.
    pub created_on: DateTime<Utc>,
    /// Description of the problem.
    pub text: String,
}

/// A message was received from the contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgReceivedEvent {
    /// When the message was received.
    pub created_on: DateTime<Utc>,
    /// The message.
    pub msg: MsgIn,
}

impl MsgReceivedEvent {
    /// Create the event, timestamped now.
    pub fn new(msg: MsgIn) -> Self {
        Self {
            created_on: Utc::now(),
            msg,
        }
    }
}

/// A dial ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialEndedEvent {
    /// When the dial ended.
    pub created_on: DateTime<Utc>,
    /// How it ended.
    pub dial: Dial,
}

impl DialEndedEvent {
    /// Create the event, timestamped now.
    pub fn new(dial: Dial) -> Self {
        Self {
            created_on: Utc::now(),
            dial,
        }
    }
}

/// A redirect ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectEndedEvent {
    /// When the redirect ended.
    pub created_on: DateTime<Utc>,
    /// The outcome reported by the channel.
    pub response: String,
}

/// A wait's timeout elapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTimedOutEvent {
    /// When the timeout fired.
    pub created_on: DateTime<Utc>,
    /// The run that owns the timed-out wait.
    pub run_uuid: RunUuid,
}

impl WaitTimedOutEvent {
    /// Create the event, timestamped now.
    pub fn new(run_uuid: RunUuid) -> Self {
        Self {
            created_on: Utc::now(),
            run_uuid,
        }
    }
}

/// A wait expired without being answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitExpiredEvent {
    /// When the wait expired.
    pub created_on: DateTime<Utc>,
}

impl WaitExpiredEvent {
    /// Create the event, timestamped now.
    pub fn new() -> Self {
        Self {
            created_on: Utc::now(),
        }
    }
}

impl Default for WaitExpiredEvent {
    fn default() -> Self {
        Self::new()
    }
}

/// A run expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunExpiredEvent {
    /// When the run expired.
    pub created_on: DateTime<Utc>,
    /// The run that expired.
    pub run_uuid: RunUuid,
}
