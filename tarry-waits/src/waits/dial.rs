use super::{FAMILY, TimeoutEnvelope, Wait, WaitKind, read_timeout};
use crate::activated::{ActivatedDialWait, ActivatedWaitKind};
use crate::decode;
use crate::events::{DialWaitEvent, Event, EventSink};
use crate::resumes::Resume;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tarry_core::types::Urn;
use tarry_core::{FlowRun, Result, WaitSettings};

pub(super) const ACCEPTS: &[&str] = &[Resume::DIAL];

/// Dials a number and waits for the call to end. Voice flows only.
///
/// Limits left unset take the [`WaitSettings`] defaults when the wait begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialWait {
    /// Template evaluating to the number to dial.
    pub phone: String,
    /// Seconds to wait for an answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dial_limit_seconds: Option<u32>,
    /// Maximum call length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_limit_seconds: Option<u32>,
}

impl DialWait {
    /// A dial wait using the default limits.
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            dial_limit_seconds: None,
            call_limit_seconds: None,
        }
    }

    /// Set the dial and call limits. A zero limit is left unset.
    #[must_use]
    pub fn with_limits(mut self, dial_limit_seconds: u32, call_limit_seconds: u32) -> Self {
        self.dial_limit_seconds = Some(dial_limit_seconds).filter(|s| *s > 0);
        self.call_limit_seconds = Some(call_limit_seconds).filter(|s| *s > 0);
        self
    }

    /// The dial and call limits, falling back to `settings`.
    pub fn limits(&self, settings: &WaitSettings) -> (u32, u32) {
        (
            self.dial_limit_seconds
                .unwrap_or(settings.default_dial_limit_seconds),
            self.call_limit_seconds
                .unwrap_or(settings.default_call_limit_seconds),
        )
    }

    /// Evaluate the phone template and resolve it to a `tel` URN.
    ///
    /// Evaluation errors are logged but the (partial) text is still tried as
    /// a number; only a text that can't be made into a URN aborts.
    pub(super) fn begin(
        &self,
        settings: &WaitSettings,
        run: &dyn FlowRun,
        sink: &mut dyn EventSink,
    ) -> Option<ActivatedWaitKind> {
        let evaluated = run.evaluate_template(&self.phone);
        for error in &evaluated.errors {
            sink.log(Event::error(error.clone()));
        }

        let country = run.environment().default_country.as_ref();
        let urn = match Urn::from_phone(&evaluated.text, country) {
            Ok(urn) => urn,
            Err(e) => {
                tracing::debug!(run_uuid = %run.uuid(), error = %e, "Dial wait has no callable number");
                sink.log(Event::error(e.to_string()));
                return None;
            }
        };

        let (dial_limit_seconds, call_limit_seconds) = self.limits(settings);
        let created_on = Utc::now();
        sink.log(Event::DialWait(DialWaitEvent {
            created_on,
            urn: urn.clone(),
            dial_limit_seconds,
            call_limit_seconds,
            expires_on: created_on
                + settings.dial_expire_after(dial_limit_seconds, call_limit_seconds),
        }));

        Some(ActivatedWaitKind::Dial(ActivatedDialWait {
            urn,
            dial_limit_seconds,
            call_limit_seconds,
        }))
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    timeout: Option<TimeoutEnvelope>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    dial_limit_seconds: Option<u32>,
    #[serde(default)]
    call_limit_seconds: Option<u32>,
}

pub(super) fn read(value: Value) -> Result<Wait> {
    let e: Envelope = decode::envelope(FAMILY, value)?;
    let phone = decode::required(e.phone.filter(|p| !p.is_empty()), "phone")?;

    let dial = DialWait::new(phone).with_limits(
        e.dial_limit_seconds.unwrap_or_default(),
        e.call_limit_seconds.unwrap_or_default(),
    );
    let wait = Wait::from_kind(WaitKind::Dial(dial));

    Ok(match read_timeout(e.timeout)? {
        Some(timeout) => wait.with_timeout(timeout),
        None => wait,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tarry_core::testing::TestRun;
    use tarry_core::types::{Country, FlowKind};

    #[test]
    fn national_number_uses_default_country() {
        let run = TestRun::new(FlowKind::Voice)
            .with_default_country(Country::parse("EC").unwrap())
            .with_context(json!({"contact": {"phone": "0979123456"}}));
        let mut events: Vec<Event> = Vec::new();

        let kind = DialWait::new("@contact.phone")
            .begin(&WaitSettings::default(), &run, &mut events)
            .unwrap();
        match kind {
            ActivatedWaitKind::Dial(dial) => assert_eq!(dial.urn.as_str(), "tel:+593979123456"),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn expiry_covers_both_limits_and_grace() {
        let run = TestRun::new(FlowKind::Voice);
        let mut events: Vec<Event> = Vec::new();

        DialWait::new("+12065551212")
            .with_limits(10, 120)
            .begin(&WaitSettings::default(), &run, &mut events)
            .unwrap();
        match &events[..] {
            [Event::DialWait(e)] => {
                assert_eq!(e.expires_on - e.created_on, chrono::Duration::seconds(160));
            }
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn unset_limits_come_from_settings() {
        let run = TestRun::new(FlowKind::Voice);
        let settings = WaitSettings {
            default_dial_limit_seconds: 30,
            default_call_limit_seconds: 600,
            ..WaitSettings::default()
        };
        let mut events: Vec<Event> = Vec::new();

        let kind = DialWait::new("+12065551212")
            .begin(&settings, &run, &mut events)
            .unwrap();
        match kind {
            ActivatedWaitKind::Dial(dial) => {
                assert_eq!(dial.dial_limit_seconds, 30);
                assert_eq!(dial.call_limit_seconds, 600);
            }
            other => panic!("unexpected kind {other:?}"),
        }

        let kind = DialWait::new("+12065551212")
            .with_limits(10, 0)
            .begin(&settings, &run, &mut events)
            .unwrap();
        match kind {
            ActivatedWaitKind::Dial(dial) => {
                assert_eq!(dial.dial_limit_seconds, 10);
                assert_eq!(dial.call_limit_seconds, 600);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn read_leaves_zero_limits_unset() {
        let wait = read(json!({"type": "dial", "phone": "+12065551212", "dial_limit_seconds": 0}))
            .unwrap();
        assert_eq!(wait.kind(), &WaitKind::Dial(DialWait::new("+12065551212")));
        assert_eq!(
            serde_json::to_value(&wait).unwrap(),
            json!({"type": "dial", "phone": "+12065551212"})
        );
    }
}
