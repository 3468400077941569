//! Readers for persisted resumes.
//!
//! Dial resumes written before dial outcomes became events carry a bare
//! `dial` object instead of an `event`. Both shapes decode to the same
//! [`ResumeKind::Dial`]; the old one is never written back.

use super::{Resume, ResumeKind};
use crate::decode;
use crate::events::{DialEndedEvent, Event};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tarry_core::registry::ReadFn;
use tarry_core::types::Dial;
use tarry_core::{Result, TarryError};

pub(crate) const READERS: &[(&str, ReadFn<Resume>)] = &[
    (Resume::MSG, read_msg),
    (Resume::DIAL, read_dial),
    (Resume::REDIRECT_END, read_redirect_end),
    (Resume::WAIT_TIMEOUT, read_wait_timeout),
    (Resume::WAIT_EXPIRATION, read_wait_expiration),
    (Resume::RUN_EXPIRATION, read_run_expiration),
];

const FAMILY: &str = "resume";

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    resumed_on: Option<DateTime<Utc>>,
    #[serde(default)]
    event: Option<Value>,
    #[serde(default)]
    dial: Option<Dial>,
    #[serde(default)]
    response: Option<String>,
}

impl Envelope {
    fn read(value: Value) -> Result<Self> {
        decode::envelope(FAMILY, value)
    }

    fn resumed_on(&self) -> Result<DateTime<Utc>> {
        decode::required(self.resumed_on, "resumed_on")
    }

    /// Take the embedded event, which must be of type `expected`.
    fn event<T>(&mut self, expected: &str, extract: fn(Event) -> Option<T>) -> Result<Option<T>> {
        let Some(value) = self.event.take() else {
            return Ok(None);
        };
        let event: Event =
            serde_json::from_value(value).map_err(|e| TarryError::invalid("event", e.to_string()))?;
        let found = event.type_name();
        extract(event).map(Some).ok_or_else(|| {
            TarryError::invalid(
                "event",
                format!("must be of type '{expected}', got '{found}'"),
            )
        })
    }
}

fn resume(resumed_on: DateTime<Utc>, kind: ResumeKind) -> Resume {
    Resume::new(kind).with_resumed_on(resumed_on)
}

fn read_msg(value: Value) -> Result<Resume> {
    let mut e = Envelope::read(value)?;
    let resumed_on = e.resumed_on()?;
    let event = e.event("msg_received", |event| match event {
        Event::MsgReceived(event) => Some(event),
        _ => None,
    })?;
    let event = decode::required(event, "event")?;
    Ok(resume(resumed_on, ResumeKind::Msg(event)))
}

fn read_dial(value: Value) -> Result<Resume> {
    let mut e = Envelope::read(value)?;
    let resumed_on = e.resumed_on()?;

    let event = e.event("dial_ended", |event| match event {
        Event::DialEnded(event) => Some(event),
        _ => None,
    })?;
    let event = match (event, e.dial.take()) {
        (Some(event), _) => event,
        (None, Some(dial)) => {
            tracing::debug!("Upgrading legacy dial resume");
            DialEndedEvent {
                created_on: resumed_on,
                dial,
            }
        }
        (None, None) => return Err(TarryError::required("event")),
    };
    Ok(resume(resumed_on, ResumeKind::Dial(event)))
}

fn read_redirect_end(value: Value) -> Result<Resume> {
    let mut e = Envelope::read(value)?;
    let resumed_on = e.resumed_on()?;
    let response = decode::required(e.response.take().filter(|r| !r.is_empty()), "response")?;
    Ok(resume(resumed_on, ResumeKind::RedirectEnd(response)))
}

fn read_wait_timeout(value: Value) -> Result<Resume> {
    let mut e = Envelope::read(value)?;
    let resumed_on = e.resumed_on()?;
    let event = e.event("wait_timed_out", |event| match event {
        Event::WaitTimedOut(event) => Some(event),
        _ => None,
    })?;
    let event = decode::required(event, "event")?;
    Ok(resume(resumed_on, ResumeKind::WaitTimeout(event)))
}

fn read_wait_expiration(value: Value) -> Result<Resume> {
    let mut e = Envelope::read(value)?;
    let resumed_on = e.resumed_on()?;
    let event = e.event("wait_expired", |event| match event {
        Event::WaitExpired(event) => Some(event),
        _ => None,
    })?;
    Ok(resume(resumed_on, ResumeKind::WaitExpiration(event)))
}

fn read_run_expiration(value: Value) -> Result<Resume> {
    let e = Envelope::read(value)?;
    Ok(resume(e.resumed_on()?, ResumeKind::RunExpiration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tarry_core::types::DialStatus;

    #[test]
    fn legacy_dial_is_upgraded() {
        let resume = read_dial(json!({
            "type": "dial",
            "resumed_on": "2021-01-20T12:18:30Z",
            "dial": {"status": "answered", "duration": 15}
        }))
        .unwrap();

        match resume.kind() {
            ResumeKind::Dial(event) => {
                assert_eq!(event.dial, Dial::new(DialStatus::Answered, 15));
                assert_eq!(event.created_on, resume.resumed_on());
            }
            other => panic!("unexpected kind {other:?}"),
        }

        let encoded = serde_json::to_value(&resume).unwrap();
        assert!(encoded.get("dial").is_none());
        assert_eq!(encoded["event"]["type"], "dial_ended");
        assert_eq!(encoded["event"]["dial"]["duration"], 15);
    }

    #[test]
    fn dial_needs_event_or_dial() {
        let err = read_dial(json!({"type": "dial", "resumed_on": "2021-01-20T12:18:30Z"})).unwrap_err();
        assert_eq!(err.to_string(), "field 'event' is required");
    }

    #[test]
    fn resumed_on_is_required() {
        let err = read_run_expiration(json!({"type": "run_expiration"})).unwrap_err();
        assert_eq!(err.to_string(), "field 'resumed_on' is required");
    }

    #[test]
    fn event_type_must_match() {
        let err = read_wait_timeout(json!({
            "type": "wait_timeout",
            "resumed_on": "2021-01-20T12:18:30Z",
            "event": {"type": "wait_expired", "created_on": "2021-01-20T12:18:30Z"}
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'event' must be of type 'wait_timed_out', got 'wait_expired'"
        );
    }

    #[test]
    fn wait_expiration_event_is_optional() {
        let resume = read_wait_expiration(json!({
            "type": "wait_expiration",
            "resumed_on": "2021-01-20T12:18:30Z"
        }))
        .unwrap();
        assert_eq!(resume.kind(), &ResumeKind::WaitExpiration(None));
    }

    #[test]
    fn redirect_end_needs_response() {
        let err = read_redirect_end(json!({
            "type": "redirect_end",
            "resumed_on": "2021-01-20T12:18:30Z",
            "response": ""
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "field 'response' is required");
    }
}
