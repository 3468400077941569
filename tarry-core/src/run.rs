//! The run seen from the wait/resume core.
//!
//! Runs are owned by the flow executor. The core only needs a narrow view of
//! them, expressed by [`FlowRun`]: enough to evaluate a dial wait's phone
//! template, to decide whether a message wait can be skipped, and to move the
//! run between statuses when a resume is applied.

use crate::types::{Country, FlowKind, FlowUuid, MsgIn, RunStatus, RunUuid, TriggerKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flow metadata a run exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowInfo {
    /// Flow identifier.
    pub uuid: FlowUuid,
    /// Display name.
    pub name: String,
    /// Kind of flow.
    pub kind: FlowKind,
    /// Minutes of inactivity after which a waiting run expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_after_minutes: Option<u32>,
}

impl FlowInfo {
    /// Create flow metadata.
    pub fn new(name: impl Into<String>, kind: FlowKind) -> Self {
        Self {
            uuid: FlowUuid::new(),
            name: name.into(),
            kind,
            expire_after_minutes: None,
        }
    }

    /// Set the expiry window.
    pub fn with_expire_after_minutes(mut self, minutes: u32) -> Self {
        self.expire_after_minutes = Some(minutes);
        self
    }
}

/// Session-level facts about how the run came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// What started the session.
    pub trigger: TriggerKind,
    /// Number of runs the session has created so far (including this one).
    pub run_count: usize,
}

impl SessionInfo {
    /// Create session info.
    pub fn new(trigger: TriggerKind, run_count: usize) -> Self {
        Self { trigger, run_count }
    }
}

/// The merged environment a run evaluates in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Country used to resolve national phone numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_country: Option<Country>,
}

impl Environment {
    /// Set the default country.
    pub fn with_default_country(mut self, country: Country) -> Self {
        self.default_country = Some(country);
        self
    }
}

/// Pending input made available to the node a run resumes at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// The message that resumed the run.
    pub msg: MsgIn,
    /// When it was received.
    pub created_on: DateTime<Utc>,
}

/// Output of evaluating a template.
///
/// Evaluation is best-effort: a failing expression contributes nothing to
/// `text` and records a message in `errors`, but the rest of the template is
/// still evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluated {
    /// The evaluated text.
    pub text: String,
    /// Errors raised while evaluating.
    pub errors: Vec<String>,
}

impl Evaluated {
    /// A successful evaluation.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            errors: Vec::new(),
        }
    }

    /// Whether evaluation raised no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Evaluates templates such as `@("+" & contact.phone)`.
///
/// Provided by the embedding runtime; the core never parses expressions.
pub trait TemplateEvaluator: Send + Sync {
    /// Evaluate `template` against `context`.
    fn evaluate(&self, template: &str, context: &serde_json::Value) -> Evaluated;
}

/// The view of a run the wait/resume core works against.
pub trait FlowRun {
    /// Run identifier.
    fn uuid(&self) -> RunUuid;

    /// The flow this run traverses.
    fn flow(&self) -> &FlowInfo;

    /// Current status.
    fn status(&self) -> RunStatus;

    /// Set the status without exiting the run.
    fn set_status(&mut self, status: RunStatus);

    /// Exit the run with a terminal status.
    fn exit(&mut self, status: RunStatus);

    /// Number of steps on the run's path so far.
    fn path_len(&self) -> usize;

    /// Session-level facts.
    fn session(&self) -> &SessionInfo;

    /// Merged environment.
    fn environment(&self) -> &Environment;

    /// Evaluate a template in the context of this run.
    fn evaluate_template(&self, template: &str) -> Evaluated;

    /// Pending input, if any.
    fn input(&self) -> Option<&Input>;

    /// Replace the pending input.
    fn set_input(&mut self, input: Option<Input>);
}
