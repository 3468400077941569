//! Wait declarations.
//!
//! A wait is part of a flow definition: it says what external event a node
//! needs before the run can continue. When a run reaches it, [`Wait::begin`]
//! evaluates any dynamic parameters and either skips the wait or produces an
//! [`ActivatedWait`] for the executor to persist. When an event later arrives,
//! [`Wait::end`] checks that the resume is one this wait accepts.
//!
//! # Example
//!
//! ```
//! use tarry_core::testing::TestRun;
//! use tarry_core::types::FlowKind;
//! use tarry_waits::{Event, Resume, Wait};
//!
//! let wait = Wait::redirect();
//! let mut run = TestRun::new(FlowKind::Voice);
//! let mut events: Vec<Event> = Vec::new();
//!
//! let activated = wait.begin(&mut run, &mut events).expect("redirect waits always activate");
//! assert_eq!(activated.type_name(), "redirect");
//! assert!(wait.end(&Resume::redirect_end("answered")).is_ok());
//! ```

mod dial;
mod msg;
mod redirect;

pub use dial::DialWait;
pub use msg::MsgWait;

use crate::activated::ActivatedWait;
use crate::decode;
use crate::events::EventSink;
use crate::hints::Hint;
use crate::resumes::Resume;
use serde::{Deserialize, Serialize};
use tarry_core::registry::ReadFn;
use tarry_core::types::{CategoryUuid, FlowKind, RunStatus};
use tarry_core::{FlowRun, Result, TarryError, WaitSettings};

/// How long a wait may go unanswered and where the run goes when it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timeout {
    seconds: u32,
    category_uuid: CategoryUuid,
}

impl Timeout {
    /// Create a timeout.
    ///
    /// # Errors
    /// [`TarryError::Validation`] if `seconds` is zero.
    pub fn new(seconds: u32, category_uuid: CategoryUuid) -> Result<Self> {
        if seconds == 0 {
            return Err(TarryError::invalid("timeout.seconds", "must be greater than zero"));
        }
        Ok(Self {
            seconds,
            category_uuid,
        })
    }

    /// Seconds before the timeout fires.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Category the node routes to on timeout.
    pub fn category_uuid(&self) -> CategoryUuid {
        self.category_uuid
    }
}

/// A wait declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wait {
    #[serde(flatten)]
    kind: WaitKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<Timeout>,
}

/// Variant-specific parameters of a wait, still unevaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WaitKind {
    /// Wait for an incoming message.
    Msg(MsgWait),
    /// Dial a number and wait for the call to end.
    Dial(DialWait),
    /// Wait for a redirect to end.
    Redirect,
}

impl Wait {
    /// A message wait.
    pub fn msg(hint: Option<Hint>) -> Self {
        Self::from_kind(WaitKind::Msg(MsgWait { hint }))
    }

    /// A dial wait with the default limits.
    pub fn dial(phone: impl Into<String>) -> Self {
        Self::from_kind(WaitKind::Dial(DialWait::new(phone)))
    }

    /// A redirect wait.
    pub fn redirect() -> Self {
        Self::from_kind(WaitKind::Redirect)
    }

    /// A wait of the given kind with no timeout.
    pub fn from_kind(kind: WaitKind) -> Self {
        Self {
            kind,
            timeout: None,
        }
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The type tag.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            WaitKind::Msg(_) => "msg",
            WaitKind::Dial(_) => "dial",
            WaitKind::Redirect => "redirect",
        }
    }

    /// The timeout, if any.
    pub fn timeout(&self) -> Option<&Timeout> {
        self.timeout.as_ref()
    }

    /// Variant-specific parameters.
    pub fn kind(&self) -> &WaitKind {
        &self.kind
    }

    /// Flow kinds this wait may appear in.
    pub fn allowed_flow_kinds(&self) -> &'static [FlowKind] {
        match &self.kind {
            WaitKind::Msg(_) | WaitKind::Redirect => &FlowKind::ALL,
            WaitKind::Dial(_) => &[FlowKind::Voice],
        }
    }

    /// Check this wait may appear in a flow of `kind`.
    pub fn check_flow_kind(&self, kind: FlowKind) -> Result<()> {
        if self.allowed_flow_kinds().contains(&kind) {
            Ok(())
        } else {
            Err(TarryError::WaitNotAllowed {
                wait_type: self.type_name().to_string(),
                flow_kind: kind.to_string(),
            })
        }
    }

    /// Begin waiting with the default settings.
    ///
    /// See [`Wait::begin_with`].
    pub fn begin(&self, run: &mut dyn FlowRun, sink: &mut dyn EventSink) -> Option<ActivatedWait> {
        self.begin_with(&WaitSettings::default(), run, sink)
    }

    /// Begin waiting.
    ///
    /// Returns `None` if the wait is skipped (or a dial wait's number can't be
    /// resolved) and the run should carry on. Otherwise the run is marked
    /// waiting, exactly one event describing the wait is logged, and the
    /// activated wait is returned for the caller to persist.
    pub fn begin_with(
        &self,
        settings: &WaitSettings,
        run: &mut dyn FlowRun,
        sink: &mut dyn EventSink,
    ) -> Option<ActivatedWait> {
        let timeout_seconds = self.timeout.map(|t| t.seconds());
        let kind = match &self.kind {
            WaitKind::Msg(wait) => wait.begin(settings, timeout_seconds, &*run, sink)?,
            WaitKind::Dial(wait) => wait.begin(settings, &*run, sink)?,
            WaitKind::Redirect => redirect::begin(sink),
        };

        run.set_status(RunStatus::Waiting);
        tracing::info!(
            run_uuid = %run.uuid(),
            wait_type = self.type_name(),
            timeout_seconds = ?timeout_seconds,
            "Wait activated"
        );
        Some(ActivatedWait::new(kind, timeout_seconds))
    }

    /// End this wait with `resume`.
    ///
    /// # Errors
    /// - [`TarryError::TimeoutNotConfigured`] for a `wait_timeout` resume when
    ///   this wait has no timeout
    /// - [`TarryError::ResumeTypeMismatch`] for any other resume this wait
    ///   doesn't accept
    pub fn end(&self, resume: &Resume) -> Result<()> {
        self.check_resume(resume).inspect_err(|e| {
            tracing::warn!(
                wait_type = self.type_name(),
                resume_type = resume.type_name(),
                error = %e,
                "Resume rejected by wait"
            );
        })
    }

    /// Whether [`Wait::end`] would accept `resume`.
    pub fn accepts(&self, resume: &Resume) -> bool {
        self.check_resume(resume).is_ok()
    }

    fn check_resume(&self, resume: &Resume) -> Result<()> {
        let resume_type = resume.type_name();
        let accepted = match &self.kind {
            WaitKind::Msg(_) => {
                if resume_type == Resume::WAIT_TIMEOUT && self.timeout.is_none() {
                    return Err(TarryError::TimeoutNotConfigured {
                        wait_type: self.type_name().to_string(),
                    });
                }
                msg::ACCEPTS.contains(&resume_type)
            }
            WaitKind::Dial(_) => dial::ACCEPTS.contains(&resume_type),
            WaitKind::Redirect => redirect::ACCEPTS.contains(&resume_type),
        };

        if accepted {
            Ok(())
        } else {
            Err(TarryError::ResumeTypeMismatch {
                wait_type: self.type_name().to_string(),
                resume_type: resume_type.to_string(),
            })
        }
    }
}

pub(crate) const READERS: &[(&str, ReadFn<Wait>)] = &[
    ("msg", msg::read),
    ("dial", dial::read),
    ("redirect", redirect::read),
];

const FAMILY: &str = "wait";

#[derive(Deserialize)]
struct TimeoutEnvelope {
    #[serde(default)]
    seconds: Option<u32>,
    #[serde(default)]
    category_uuid: Option<CategoryUuid>,
}

/// Validate the optional `timeout` object shared by every wait.
fn read_timeout(timeout: Option<TimeoutEnvelope>) -> Result<Option<Timeout>> {
    let Some(e) = timeout else {
        return Ok(None);
    };
    let seconds = decode::required(e.seconds.filter(|s| *s > 0), "timeout.seconds")?;
    let category_uuid = decode::required(e.category_uuid, "timeout.category_uuid")?;
    Timeout::new(seconds, category_uuid).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn category() -> CategoryUuid {
        CategoryUuid::parse("9b4ab4a8-6ae3-4a2e-9e6e-12a6e2a0b1cd").unwrap()
    }

    #[test]
    fn timeout_validation() {
        assert_eq!(read_timeout(None).unwrap(), None);

        let err = read_timeout(Some(TimeoutEnvelope {
            seconds: Some(0),
            category_uuid: Some(category()),
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "field 'timeout.seconds' is required");

        let err = read_timeout(Some(TimeoutEnvelope {
            seconds: Some(10),
            category_uuid: None,
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "field 'timeout.category_uuid' is required");
    }

    #[test]
    fn zero_second_timeout_is_rejected() {
        let err = Timeout::new(0, category()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'timeout.seconds' must be greater than zero"
        );
        assert!(err.is_decode_error());
    }

    #[test]
    fn encoding_includes_timeout() {
        let wait = Wait::redirect().with_timeout(Timeout::new(30, category()).unwrap());
        assert_eq!(
            serde_json::to_value(&wait).unwrap(),
            json!({
                "type": "redirect",
                "timeout": {"seconds": 30, "category_uuid": "9b4ab4a8-6ae3-4a2e-9e6e-12a6e2a0b1cd"}
            })
        );
    }

    #[test]
    fn flow_kinds() {
        assert!(Wait::msg(None).check_flow_kind(FlowKind::MessagingOffline).is_ok());
        assert!(Wait::dial("+1").check_flow_kind(FlowKind::Voice).is_ok());

        let err = Wait::dial("+1").check_flow_kind(FlowKind::Messaging).unwrap_err();
        assert_eq!(
            err.to_string(),
            "wait of type 'dial' is not allowed in a flow of type 'messaging'"
        );
    }

    #[test]
    fn msg_timeout_resume_requires_timeout() {
        let resume = Resume::wait_timeout(tarry_core::types::RunUuid::new());

        let err = Wait::msg(None).end(&resume).unwrap_err();
        assert_eq!(
            err.to_string(),
            "can't end a wait of type 'msg' with a resume of type 'wait_timeout' as it has no timeout"
        );

        let timed = Wait::msg(None).with_timeout(Timeout::new(60, category()).unwrap());
        assert!(timed.end(&resume).is_ok());
    }
}
