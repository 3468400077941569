//! Activated waits: what a suspended run persists.
//!
//! An activated wait holds already-evaluated values (the resolved URN of a
//! dial, the hint of a message wait) so that it can be decoded later without
//! re-running any evaluation. It carries no behavior of its own.

use crate::decode;
use crate::hints::Hint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tarry_core::registry::ReadFn;
use tarry_core::types::Urn;
use tarry_core::{Result, TarryError, WaitSettings};

/// The persisted, in-flight counterpart of a wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivatedWait {
    #[serde(flatten)]
    kind: ActivatedWaitKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_seconds: Option<u32>,
}

/// Variant-specific state of an activated wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivatedWaitKind {
    /// Waiting for a message.
    Msg(ActivatedMsgWait),
    /// Waiting for a dial to end.
    Dial(ActivatedDialWait),
    /// Waiting for a redirect to end.
    Redirect,
}

/// An activated message wait.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivatedMsgWait {
    /// Expected response media.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<Hint>,
}

/// An activated dial wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivatedDialWait {
    /// The resolved number being dialed.
    pub urn: Urn,
    /// Seconds to wait for an answer.
    pub dial_limit_seconds: u32,
    /// Maximum call length in seconds.
    pub call_limit_seconds: u32,
}

impl ActivatedWait {
    /// Create an activated wait.
    pub fn new(kind: ActivatedWaitKind, timeout_seconds: Option<u32>) -> Self {
        Self {
            kind,
            timeout_seconds,
        }
    }

    /// The type tag, equal to that of the wait it came from.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ActivatedWaitKind::Msg(_) => "msg",
            ActivatedWaitKind::Dial(_) => "dial",
            ActivatedWaitKind::Redirect => "redirect",
        }
    }

    /// Seconds until the wait times out; present iff the wait had a timeout.
    pub fn timeout_seconds(&self) -> Option<u32> {
        self.timeout_seconds
    }

    /// Variant-specific state.
    pub fn kind(&self) -> &ActivatedWaitKind {
        &self.kind
    }

    /// The hint of an activated message wait.
    pub fn hint(&self) -> Option<&Hint> {
        match &self.kind {
            ActivatedWaitKind::Msg(w) => w.hint.as_ref(),
            _ => None,
        }
    }

    /// The resolved URN of an activated dial wait.
    pub fn urn(&self) -> Option<&Urn> {
        match &self.kind {
            ActivatedWaitKind::Dial(w) => Some(&w.urn),
            _ => None,
        }
    }
}

pub(crate) const READERS: &[(&str, ReadFn<ActivatedWait>)] = &[
    ("msg", read_msg),
    ("dial", read_dial),
    ("redirect", read_redirect),
];

const FAMILY: &str = "activated wait";

#[derive(Deserialize)]
struct MsgEnvelope {
    #[serde(default)]
    timeout_seconds: Option<u32>,
    #[serde(default)]
    hint: Option<Value>,
}

#[derive(Deserialize)]
struct DialEnvelope {
    #[serde(default)]
    timeout_seconds: Option<u32>,
    #[serde(default)]
    urn: Option<String>,
    #[serde(default)]
    dial_limit_seconds: Option<u32>,
    #[serde(default)]
    call_limit_seconds: Option<u32>,
}

#[derive(Deserialize)]
struct RedirectEnvelope {
    #[serde(default)]
    timeout_seconds: Option<u32>,
}

fn read_msg(value: Value) -> Result<ActivatedWait> {
    let e: MsgEnvelope = decode::envelope(FAMILY, value)?;
    let hint = e.hint.map(crate::registry::read_embedded_hint).transpose()?;
    Ok(ActivatedWait::new(
        ActivatedWaitKind::Msg(ActivatedMsgWait { hint }),
        decode::positive(e.timeout_seconds, "timeout_seconds")?,
    ))
}

fn read_dial(value: Value) -> Result<ActivatedWait> {
    let e: DialEnvelope = decode::envelope(FAMILY, value)?;
    let urn = decode::required(e.urn.filter(|u| !u.is_empty()), "urn")?;
    let urn = Urn::parse(&urn).map_err(|err| TarryError::invalid("urn", err.to_string()))?;

    // limits are resolved when a wait begins; records missing them predate
    // that and take the built-in defaults
    let defaults = WaitSettings::default();
    let dial_limit_seconds = decode::positive(e.dial_limit_seconds, "dial_limit_seconds")?
        .unwrap_or(defaults.default_dial_limit_seconds);
    let call_limit_seconds = decode::positive(e.call_limit_seconds, "call_limit_seconds")?
        .unwrap_or(defaults.default_call_limit_seconds);

    Ok(ActivatedWait::new(
        ActivatedWaitKind::Dial(ActivatedDialWait {
            urn,
            dial_limit_seconds,
            call_limit_seconds,
        }),
        decode::positive(e.timeout_seconds, "timeout_seconds")?,
    ))
}

fn read_redirect(value: Value) -> Result<ActivatedWait> {
    let e: RedirectEnvelope = decode::envelope(FAMILY, value)?;
    Ok(ActivatedWait::new(
        ActivatedWaitKind::Redirect,
        decode::positive(e.timeout_seconds, "timeout_seconds")?,
    ))
}
