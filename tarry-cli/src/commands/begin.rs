//! Begin command - activate a wait against an in-memory run.

use super::{print_json, read_input};
use anyhow::{Context, Result};
use serde::Serialize;
use tarry_core::testing::TestRun;
use tarry_core::types::{Country, FlowKind, RunStatus, TriggerKind};
use tarry_core::{FlowRun, WaitSettings};
use tarry_waits::{ActivatedWait, Event, EventLog};

/// How to set up the run the wait begins in.
#[derive(Debug, Clone, Copy)]
pub struct BeginOptions<'a> {
    /// Flow kind name (`messaging`, `messaging_offline` or `voice`).
    pub flow_kind: &'a str,
    /// Default country code.
    pub country: Option<&'a str>,
    /// Whether the session was started by an inbound message.
    pub msg_trigger: bool,
}

#[derive(Serialize)]
struct BeginReport {
    status: RunStatus,
    events: Vec<Event>,
    activated: Option<ActivatedWait>,
}

/// Run the begin command.
pub fn run(wait_file: &str, settings: &WaitSettings, options: BeginOptions<'_>) -> Result<()> {
    let wait = tarry_waits::read_wait(&read_input(wait_file)?)
        .with_context(|| format!("Invalid wait in {}", wait_file))?;

    let flow_kind = FlowKind::parse(options.flow_kind)
        .with_context(|| format!("Unknown flow kind: {}", options.flow_kind))?;
    wait.check_flow_kind(flow_kind)?;

    let mut run = TestRun::new(flow_kind);
    if options.msg_trigger {
        run = run.with_trigger(TriggerKind::Msg);
    }
    if let Some(code) = options.country {
        run = run.with_default_country(Country::parse(code)?);
    }

    let log = EventLog::new();
    let activated = wait.begin_with(settings, &mut run, &mut &log);
    tracing::info!(
        wait_type = wait.type_name(),
        activated = activated.is_some(),
        events = log.len(),
        "Wait begun"
    );

    print_json(&BeginReport {
        status: run.status(),
        events: log.all(),
        activated,
    })
}
