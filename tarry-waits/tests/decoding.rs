//! Decoding the persisted families through the standard registries.

use chrono::{DateTime, Utc};
use serde_json::json;
use tarry_core::{TarryError, WaitSettings};
use tarry_core::types::{CategoryUuid, Dial, DialStatus, MsgIn, RunUuid, Urn};
use tarry_waits::{
    ActivatedDialWait, ActivatedMsgWait, ActivatedWait, ActivatedWaitKind, DialWait, Hint, Resume,
    ResumeKind, Timeout, Wait, WaitKind, read_activated_wait, read_activated_wait_value,
    read_hint, read_resume, read_resume_value, read_wait, read_wait_value,
};

fn resumed_on() -> DateTime<Utc> {
    "2024-01-15T10:30:00Z".parse().unwrap()
}

fn category() -> CategoryUuid {
    CategoryUuid::parse("f2f1dc5a-4b3e-4d8a-9a61-2f4b1b7c3e11").unwrap()
}

#[test]
fn test_unknown_and_missing_types() {
    let unknown = br#"{"type": "telepathy"}"#;
    let missing = br#"{"phone": "+12065551212"}"#;

    let errors = [
        read_wait(unknown).unwrap_err(),
        read_activated_wait(unknown).unwrap_err(),
        read_resume(unknown).unwrap_err(),
        read_hint(unknown).unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.to_string(), "unknown type: 'telepathy'");
        assert!(err.is_decode_error());
    }

    let errors = [
        read_wait(missing).unwrap_err(),
        read_activated_wait(missing).unwrap_err(),
        read_resume(missing).unwrap_err(),
        read_hint(missing).unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err, TarryError::MissingTypeField);
        assert_eq!(err.to_string(), "field 'type' is required");
    }
}

#[test]
fn test_type_must_be_a_nonempty_string() {
    assert_eq!(
        read_wait_value(json!({"type": ""})).unwrap_err(),
        TarryError::MissingTypeField
    );
    assert_eq!(
        read_wait_value(json!({"type": 3})).unwrap_err(),
        TarryError::MissingTypeField
    );
    assert_eq!(
        read_wait_value(json!(["msg"])).unwrap_err(),
        TarryError::MissingTypeField
    );
}

#[test]
fn test_invalid_json_is_malformed() {
    let err = read_resume(b"{not json").unwrap_err();
    assert!(matches!(err, TarryError::Malformed { family: "resume", .. }));
    assert!(err.to_string().starts_with("unable to read resume: "));
}

#[test]
fn test_waits_round_trip() {
    let waits = [
        Wait::msg(None),
        Wait::msg(Some(Hint::terminated_digits("#"))).with_timeout(Timeout::new(300, category()).unwrap()),
        Wait::dial("@contact.phone"),
        Wait::from_kind(WaitKind::Dial(DialWait::new("+12065551212").with_limits(10, 120)))
            .with_timeout(Timeout::new(30, category()).unwrap()),
        Wait::redirect(),
    ];

    for wait in waits {
        let data = serde_json::to_vec(&wait).unwrap();
        assert_eq!(read_wait(&data).unwrap(), wait);
    }
}

#[test]
fn test_activated_waits_round_trip() {
    let urn = Urn::parse("tel:+593979123456").unwrap();
    let activated = [
        ActivatedWait::new(ActivatedWaitKind::Msg(ActivatedMsgWait::default()), None),
        ActivatedWait::new(
            ActivatedWaitKind::Msg(ActivatedMsgWait {
                hint: Some(Hint::Audio),
            }),
            Some(60),
        ),
        ActivatedWait::new(
            ActivatedWaitKind::Dial(ActivatedDialWait {
                urn,
                dial_limit_seconds: 15,
                call_limit_seconds: 600,
            }),
            None,
        ),
        ActivatedWait::new(ActivatedWaitKind::Redirect, Some(10)),
    ];

    for wait in activated {
        let data = serde_json::to_vec(&wait).unwrap();
        assert_eq!(read_activated_wait(&data).unwrap(), wait);
    }
}

#[test]
fn test_resumes_round_trip() {
    let resumes = [
        Resume::msg(MsgIn::new("yes").with_urn("tel:+12065551212")),
        Resume::dial(Dial::new(DialStatus::NoAnswer, 0)),
        Resume::redirect_end("completed"),
        Resume::wait_timeout(RunUuid::new()),
        Resume::wait_expiration(),
        Resume::new(ResumeKind::WaitExpiration(None)),
        Resume::run_expiration(),
    ];

    for resume in resumes {
        let resume = resume.with_resumed_on(resumed_on());
        let data = serde_json::to_vec(&resume).unwrap();
        assert_eq!(read_resume(&data).unwrap(), resume);
    }
}

#[test]
fn test_hints_round_trip() {
    let hints = [
        Hint::Image,
        Hint::Audio,
        Hint::Video,
        Hint::Location,
        Hint::Geo,
        Hint::digits(),
        Hint::fixed_digits(4),
        Hint::terminated_digits("#"),
    ];

    for hint in hints {
        let data = serde_json::to_vec(&hint).unwrap();
        assert_eq!(read_hint(&data).unwrap(), hint);

        let wait = Wait::msg(Some(hint));
        let data = serde_json::to_vec(&wait).unwrap();
        assert_eq!(read_wait(&data).unwrap(), wait);
    }
}

#[test]
fn test_dial_wait_decoding() {
    let err = read_wait_value(json!({"type": "dial"})).unwrap_err();
    assert_eq!(err.to_string(), "field 'phone' is required");

    let wait = read_wait_value(json!({"type": "dial", "phone": "+593979123456"})).unwrap();
    match wait.kind() {
        WaitKind::Dial(dial) => {
            assert_eq!(dial.dial_limit_seconds, None);
            assert_eq!(dial.call_limit_seconds, None);
            assert_eq!(dial.limits(&WaitSettings::default()), (60, 7200));
        }
        other => panic!("unexpected kind {other:?}"),
    }

    let wait = read_wait_value(json!({
        "type": "dial",
        "phone": "+593979123456",
        "dial_limit_seconds": 10,
        "call_limit_seconds": 120
    }))
    .unwrap();
    assert_eq!(
        serde_json::to_value(&wait).unwrap(),
        json!({
            "type": "dial",
            "phone": "+593979123456",
            "dial_limit_seconds": 10,
            "call_limit_seconds": 120
        })
    );
}

#[test]
fn test_timeout_is_validated() {
    let err = read_wait_value(json!({
        "type": "msg",
        "timeout": {"seconds": 0, "category_uuid": category()}
    }))
    .unwrap_err();
    assert_eq!(err.to_string(), "field 'timeout.seconds' is required");

    let err = read_wait_value(json!({"type": "redirect", "timeout": {"seconds": 60}})).unwrap_err();
    assert_eq!(err.to_string(), "field 'timeout.category_uuid' is required");
}

#[test]
fn test_activated_dial_needs_urn() {
    let err = read_activated_wait_value(json!({"type": "dial"})).unwrap_err();
    assert_eq!(err.to_string(), "field 'urn' is required");

    let err = read_activated_wait_value(json!({"type": "dial", "urn": "tel:abc"})).unwrap_err();
    assert!(err.to_string().starts_with("field 'urn' "));

    let wait = read_activated_wait_value(json!({"type": "dial", "urn": "tel:+12065551212"})).unwrap();
    match wait.kind() {
        ActivatedWaitKind::Dial(dial) => {
            assert_eq!(dial.dial_limit_seconds, 60);
            assert_eq!(dial.call_limit_seconds, 7200);
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn test_embedded_hint_errors() {
    let err = read_activated_wait_value(json!({"type": "msg", "hint": {"type": "smell"}})).unwrap_err();
    assert_eq!(err.to_string(), "unable to read hint: unknown type: 'smell'");
}

#[test]
fn test_legacy_dial_resume() {
    let resume = read_resume_value(json!({
        "type": "dial",
        "resumed_on": "2024-01-15T10:30:00Z",
        "dial": {"status": "busy", "duration": 0}
    }))
    .unwrap();

    let expected = Resume::dial(Dial::new(DialStatus::Busy, 0)).with_resumed_on(resumed_on());
    match (resume.kind(), expected.kind()) {
        (ResumeKind::Dial(got), ResumeKind::Dial(want)) => {
            assert_eq!(got.dial, want.dial);
            assert_eq!(got.created_on, resumed_on());
        }
        other => panic!("unexpected kinds {other:?}"),
    }

    let encoded = serde_json::to_value(&resume).unwrap();
    assert_eq!(
        encoded,
        json!({
            "type": "dial",
            "resumed_on": "2024-01-15T10:30:00Z",
            "event": {
                "type": "dial_ended",
                "created_on": "2024-01-15T10:30:00Z",
                "dial": {"status": "busy", "duration": 0}
            }
        })
    );
}

#[test]
fn test_resume_event_must_match_type() {
    let err = read_resume_value(json!({
        "type": "msg",
        "resumed_on": "2024-01-15T10:30:00Z",
        "event": {
            "type": "dial_ended",
            "created_on": "2024-01-15T10:30:00Z",
            "dial": {"status": "answered", "duration": 3}
        }
    }))
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "field 'event' must be of type 'msg_received', got 'dial_ended'"
    );
}
