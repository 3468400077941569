//! Resumes: the external events that end a suspension.
//!
//! A resume is built from an incoming event when a suspended run is picked up
//! again. The caller checks it against the run's wait with [`Wait::end`] and
//! then calls [`Resume::apply`] to update the run.
//!
//! [`Wait::end`]: crate::Wait::end

mod read;

pub(crate) use read::READERS;

use crate::events::{
    DialEndedEvent, Event, EventSink, MsgReceivedEvent, RedirectEndedEvent, RunExpiredEvent,
    WaitExpiredEvent, WaitTimedOutEvent,
};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tarry_core::types::{Dial, MsgIn, RunStatus, RunUuid};
use tarry_core::{FlowRun, Input};

/// An event that ends a wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resume {
    resumed_on: DateTime<Utc>,
    kind: ResumeKind,
}

/// What resumed the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeKind {
    /// A message arrived.
    Msg(MsgReceivedEvent),
    /// A dial ended.
    Dial(DialEndedEvent),
    /// A redirect ended with the given response.
    RedirectEnd(String),
    /// The wait's timeout elapsed.
    WaitTimeout(WaitTimedOutEvent),
    /// The wait expired unanswered.
    WaitExpiration(Option<WaitExpiredEvent>),
    /// The run expired.
    RunExpiration,
}

impl Resume {
    /// Tag of message resumes.
    pub const MSG: &'static str = "msg";
    /// Tag of dial resumes.
    pub const DIAL: &'static str = "dial";
    /// Tag of redirect-end resumes.
    pub const REDIRECT_END: &'static str = "redirect_end";
    /// Tag of wait-timeout resumes.
    pub const WAIT_TIMEOUT: &'static str = "wait_timeout";
    /// Tag of wait-expiration resumes.
    pub const WAIT_EXPIRATION: &'static str = "wait_expiration";
    /// Tag of run-expiration resumes.
    pub const RUN_EXPIRATION: &'static str = "run_expiration";

    /// A resume of the given kind, resumed now.
    pub fn new(kind: ResumeKind) -> Self {
        Self {
            resumed_on: Utc::now(),
            kind,
        }
    }

    /// Resume with a received message.
    pub fn msg(msg: MsgIn) -> Self {
        Self::new(ResumeKind::Msg(MsgReceivedEvent::new(msg)))
    }

    /// Resume with the outcome of a dial.
    pub fn dial(dial: Dial) -> Self {
        Self::new(ResumeKind::Dial(DialEndedEvent::new(dial)))
    }

    /// Resume because a redirect ended.
    pub fn redirect_end(response: impl Into<String>) -> Self {
        Self::new(ResumeKind::RedirectEnd(response.into()))
    }

    /// Resume because the timeout of `run_uuid`'s wait elapsed.
    pub fn wait_timeout(run_uuid: RunUuid) -> Self {
        Self::new(ResumeKind::WaitTimeout(WaitTimedOutEvent::new(run_uuid)))
    }

    /// Resume because the wait expired.
    pub fn wait_expiration() -> Self {
        Self::new(ResumeKind::WaitExpiration(Some(WaitExpiredEvent::new())))
    }

    /// Resume because the run expired.
    pub fn run_expiration() -> Self {
        Self::new(ResumeKind::RunExpiration)
    }

    /// Override when the resume happened.
    #[must_use]
    pub fn with_resumed_on(mut self, resumed_on: DateTime<Utc>) -> Self {
        self.resumed_on = resumed_on;
        self
    }

    /// The type tag.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ResumeKind::Msg(_) => Self::MSG,
            ResumeKind::Dial(_) => Self::DIAL,
            ResumeKind::RedirectEnd(_) => Self::REDIRECT_END,
            ResumeKind::WaitTimeout(_) => Self::WAIT_TIMEOUT,
            ResumeKind::WaitExpiration(_) => Self::WAIT_EXPIRATION,
            ResumeKind::RunExpiration => Self::RUN_EXPIRATION,
        }
    }

    /// When the run was resumed.
    pub fn resumed_on(&self) -> DateTime<Utc> {
        self.resumed_on
    }

    /// Variant-specific payload.
    pub fn kind(&self) -> &ResumeKind {
        &self.kind
    }

    /// The domain event this resume is based on, if it has one.
    pub fn event(&self) -> Option<Event> {
        match &self.kind {
            ResumeKind::Msg(e) => Some(Event::MsgReceived(e.clone())),
            ResumeKind::Dial(e) => Some(Event::DialEnded(e.clone())),
            ResumeKind::WaitTimeout(e) => Some(Event::WaitTimedOut(e.clone())),
            ResumeKind::WaitExpiration(e) => e.clone().map(Event::WaitExpired),
            ResumeKind::RedirectEnd(_) | ResumeKind::RunExpiration => None,
        }
    }

    /// Apply this resume to `run`.
    ///
    /// Every resume moves a waiting run back to active and clears its pending
    /// input. On top of that:
    ///
    /// - `msg` makes the received message the pending input
    /// - `redirect_end` logs `redirect_ended` first
    /// - `wait_expiration` exits the run as expired first
    /// - `run_expiration` exits the run as expired and logs `run_expired` first
    ///
    /// A run that has already completed, failed or expired keeps its status.
    pub fn apply(&self, run: &mut dyn FlowRun, sink: &mut dyn EventSink) {
        match &self.kind {
            ResumeKind::Msg(event) => {
                self.apply_default(run);
                run.set_input(Some(Input {
                    msg: event.msg.clone(),
                    created_on: event.created_on,
                }));
            }
            ResumeKind::RedirectEnd(response) => {
                sink.log(Event::RedirectEnded(RedirectEndedEvent {
                    created_on: Utc::now(),
                    response: response.clone(),
                }));
                self.apply_default(run);
            }
            ResumeKind::WaitExpiration(_) => {
                expire(run);
                self.apply_default(run);
            }
            ResumeKind::RunExpiration => {
                if expire(run) {
                    sink.log(Event::RunExpired(RunExpiredEvent {
                        created_on: Utc::now(),
                        run_uuid: run.uuid(),
                    }));
                }
                self.apply_default(run);
            }
            ResumeKind::Dial(_) | ResumeKind::WaitTimeout(_) => self.apply_default(run),
        }
    }

    fn apply_default(&self, run: &mut dyn FlowRun) {
        if run.status() == RunStatus::Waiting {
            run.set_status(RunStatus::Active);
            tracing::debug!(
                run_uuid = %run.uuid(),
                resume_type = self.type_name(),
                "Run resumed"
            );
        }
        run.set_input(None);
    }
}

/// Exit `run` as expired unless it already ended. Returns whether it exited.
fn expire(run: &mut dyn FlowRun) -> bool {
    let status = run.status();
    if status.is_terminal() {
        tracing::debug!(run_uuid = %run.uuid(), %status, "Run already ended, not expiring");
        return false;
    }
    run.exit(RunStatus::Expired);
    tracing::info!(run_uuid = %run.uuid(), "Run expired");
    true
}

#[derive(Serialize)]
struct ResumeOut<'a> {
    #[serde(rename = "type")]
    type_name: &'static str,
    resumed_on: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<&'a str>,
}

impl Serialize for Resume {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let response = match &self.kind {
            ResumeKind::RedirectEnd(response) => Some(response.as_str()),
            _ => None,
        };
        ResumeOut {
            type_name: self.type_name(),
            resumed_on: self.resumed_on,
            event: self.event(),
            response,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tarry_core::testing::TestRun;
    use tarry_core::types::{DialStatus, FlowKind};

    fn waiting_run() -> TestRun {
        TestRun::new(FlowKind::Messaging).with_status(RunStatus::Waiting)
    }

    #[test]
    fn msg_sets_input() {
        let mut run = waiting_run();
        let mut events: Vec<Event> = Vec::new();

        Resume::msg(MsgIn::new("yes")).apply(&mut run, &mut events);
        assert_eq!(run.status(), RunStatus::Active);
        assert_eq!(run.input().unwrap().msg.text, "yes");
        assert!(events.is_empty());
    }

    #[test]
    fn other_resumes_clear_input() {
        let mut run = waiting_run().with_input(Input {
            msg: MsgIn::new("old"),
            created_on: Utc::now(),
        });
        let mut events: Vec<Event> = Vec::new();

        Resume::dial(Dial::new(DialStatus::Answered, 5)).apply(&mut run, &mut events);
        assert_eq!(run.status(), RunStatus::Active);
        assert!(run.input().is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn redirect_end_logs_event() {
        let mut run = waiting_run();
        let mut events: Vec<Event> = Vec::new();

        Resume::redirect_end("answered").apply(&mut run, &mut events);
        assert_eq!(run.status(), RunStatus::Active);
        match &events[..] {
            [Event::RedirectEnded(e)] => assert_eq!(e.response, "answered"),
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn wait_expiration_exits_quietly() {
        let mut run = waiting_run();
        let mut events: Vec<Event> = Vec::new();

        Resume::wait_expiration().apply(&mut run, &mut events);
        assert_eq!(run.status(), RunStatus::Expired);
        assert!(run.has_exited());
        assert!(events.is_empty());
    }

    #[test]
    fn expiry_never_revives_or_replaces_an_ended_run() {
        let mut run = waiting_run().with_status(RunStatus::Completed);
        let mut events: Vec<Event> = Vec::new();

        Resume::run_expiration().apply(&mut run, &mut events);
        assert_eq!(run.status(), RunStatus::Completed);
        assert!(events.is_empty());

        let mut run = waiting_run().with_status(RunStatus::Expired);
        Resume::msg(MsgIn::new("late")).apply(&mut run, &mut events);
        assert_eq!(run.status(), RunStatus::Expired);
    }

    #[test]
    fn encoding() {
        let resumed_on: DateTime<Utc> = "2024-01-15T10:30:00Z".parse().unwrap();
        let resume = Resume::redirect_end("busy").with_resumed_on(resumed_on);
        assert_eq!(
            serde_json::to_value(&resume).unwrap(),
            json!({"type": "redirect_end", "resumed_on": "2024-01-15T10:30:00Z", "response": "busy"})
        );

        let resume = Resume::new(ResumeKind::WaitExpiration(None)).with_resumed_on(resumed_on);
        assert_eq!(
            serde_json::to_value(&resume).unwrap(),
            json!({"type": "wait_expiration", "resumed_on": "2024-01-15T10:30:00Z"})
        );
    }
}
