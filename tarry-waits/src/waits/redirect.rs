use super::{FAMILY, TimeoutEnvelope, Wait, WaitKind, read_timeout};
use crate::activated::ActivatedWaitKind;
use crate::decode;
use crate::events::{Event, EventSink, RedirectWaitEvent};
use crate::resumes::Resume;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tarry_core::Result;

pub(super) const ACCEPTS: &[&str] = &[Resume::REDIRECT_END];

pub(super) fn begin(sink: &mut dyn EventSink) -> ActivatedWaitKind {
    sink.log(Event::RedirectWait(RedirectWaitEvent {
        created_on: Utc::now(),
    }));
    ActivatedWaitKind::Redirect
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    timeout: Option<TimeoutEnvelope>,
}

pub(super) fn read(value: Value) -> Result<Wait> {
    let e: Envelope = decode::envelope(FAMILY, value)?;
    let wait = Wait::from_kind(WaitKind::Redirect);

    Ok(match read_timeout(e.timeout)? {
        Some(timeout) => wait.with_timeout(timeout),
        None => wait,
    })
}
