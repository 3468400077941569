use super::{FAMILY, TimeoutEnvelope, Wait, WaitKind, read_timeout};
use crate::activated::{ActivatedMsgWait, ActivatedWaitKind};
use crate::decode;
use crate::events::{Event, EventSink, MsgWaitEvent};
use crate::hints::Hint;
use crate::resumes::Resume;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tarry_core::{FlowRun, Result, WaitSettings};

/// Resumes a message wait accepts. `wait_timeout` only when it has a timeout.
pub(super) const ACCEPTS: &[&str] = &[
    Resume::MSG,
    Resume::RUN_EXPIRATION,
    Resume::WAIT_EXPIRATION,
    Resume::WAIT_TIMEOUT,
];

/// Waits for an incoming message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MsgWait {
    /// Expected response media.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<Hint>,
}

impl MsgWait {
    pub(super) fn begin(
        &self,
        settings: &WaitSettings,
        timeout_seconds: Option<u32>,
        run: &dyn FlowRun,
        sink: &mut dyn EventSink,
    ) -> Option<ActivatedWaitKind> {
        // A run started by a message whose first step is this wait would be
        // waiting for the message that started it. This depends on the exact
        // run and path counts, so changes to how either is kept change
        // whether sessions pause here.
        let session = run.session();
        if session.trigger.carries_msg() && session.run_count == 1 && run.path_len() == 1 {
            tracing::debug!(
                run_uuid = %run.uuid(),
                "Skipping message wait, triggering message already received"
            );
            return None;
        }

        let created_on = Utc::now();
        sink.log(Event::MsgWait(MsgWaitEvent {
            created_on,
            timeout_seconds,
            expires_on: created_on + settings.expire_after(run.flow()),
            hint: self.hint.clone(),
        }));

        Some(ActivatedWaitKind::Msg(ActivatedMsgWait {
            hint: self.hint.clone(),
        }))
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    timeout: Option<TimeoutEnvelope>,
    #[serde(default)]
    hint: Option<Value>,
}

pub(super) fn read(value: Value) -> Result<Wait> {
    let e: Envelope = decode::envelope(FAMILY, value)?;
    let hint = e.hint.map(crate::registry::read_embedded_hint).transpose()?;
    let wait = Wait::from_kind(WaitKind::Msg(MsgWait { hint }));

    Ok(match read_timeout(e.timeout)? {
        Some(timeout) => wait.with_timeout(timeout),
        None => wait,
    })
}
