//! An in-memory run.

use super::MiniTemplates;
use crate::run::{Environment, Evaluated, FlowInfo, FlowRun, Input, SessionInfo, TemplateEvaluator};
use crate::types::{Country, FlowKind, RunStatus, RunUuid, TriggerKind};
use serde_json::Value;

/// A [`FlowRun`] held entirely in memory.
///
/// Starts active, one step into a manually triggered session, with an empty
/// template context evaluated by [`MiniTemplates`].
///
/// ```
/// use tarry_core::testing::TestRun;
/// use tarry_core::types::{FlowKind, TriggerKind};
///
/// let run = TestRun::new(FlowKind::Voice)
///     .with_trigger(TriggerKind::Msg)
///     .with_context(serde_json::json!({"contact": {"phone": "+12065551212"}}));
/// ```
pub struct TestRun {
    uuid: RunUuid,
    flow: FlowInfo,
    status: RunStatus,
    exited: bool,
    path_len: usize,
    session: SessionInfo,
    environment: Environment,
    input: Option<Input>,
    context: Value,
    evaluator: Box<dyn TemplateEvaluator>,
}

impl TestRun {
    /// Create a run in a fresh flow of the given kind.
    pub fn new(kind: FlowKind) -> Self {
        Self::in_flow(FlowInfo::new("Test Flow", kind))
    }

    /// Create a run in the given flow.
    pub fn in_flow(flow: FlowInfo) -> Self {
        Self {
            uuid: RunUuid::new(),
            flow,
            status: RunStatus::Active,
            exited: false,
            path_len: 1,
            session: SessionInfo::new(TriggerKind::Manual, 1),
            environment: Environment::default(),
            input: None,
            context: Value::Object(Default::default()),
            evaluator: Box::new(MiniTemplates::new()),
        }
    }

    /// Set the status.
    pub fn with_status(mut self, status: RunStatus) -> Self {
        self.status = status;
        self
    }

    /// Set what triggered the session.
    pub fn with_trigger(mut self, trigger: TriggerKind) -> Self {
        self.session.trigger = trigger;
        self
    }

    /// Set how many runs the session has.
    pub fn with_run_count(mut self, run_count: usize) -> Self {
        self.session.run_count = run_count;
        self
    }

    /// Set the number of steps on the path.
    pub fn with_path_len(mut self, path_len: usize) -> Self {
        self.path_len = path_len;
        self
    }

    /// Set the default country.
    pub fn with_default_country(mut self, country: Country) -> Self {
        self.environment.default_country = Some(country);
        self
    }

    /// Set the pending input.
    pub fn with_input(mut self, input: Input) -> Self {
        self.input = Some(input);
        self
    }

    /// Set the context templates are evaluated against.
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    /// Replace the template evaluator.
    pub fn with_evaluator(mut self, evaluator: impl TemplateEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Whether [`FlowRun::exit`] has been called.
    pub fn has_exited(&self) -> bool {
        self.exited
    }
}

impl FlowRun for TestRun {
    fn uuid(&self) -> RunUuid {
        self.uuid
    }

    fn flow(&self) -> &FlowInfo {
        &self.flow
    }

    fn status(&self) -> RunStatus {
        self.status
    }

    fn set_status(&mut self, status: RunStatus) {
        self.status = status;
    }

    fn exit(&mut self, status: RunStatus) {
        self.status = status;
        self.exited = true;
    }

    fn path_len(&self) -> usize {
        self.path_len
    }

    fn session(&self) -> &SessionInfo {
        &self.session
    }

    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn evaluate_template(&self, template: &str) -> Evaluated {
        self.evaluator.evaluate(template, &self.context)
    }

    fn input(&self) -> Option<&Input> {
        self.input.as_ref()
    }

    fn set_input(&mut self, input: Option<Input>) {
        self.input = input;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Upper;

    impl TemplateEvaluator for Upper {
        fn evaluate(&self, template: &str, _: &Value) -> Evaluated {
            Evaluated::ok(template.to_uppercase())
        }
    }

    #[test]
    fn defaults() {
        let run = TestRun::new(FlowKind::Messaging);
        assert_eq!(run.status(), RunStatus::Active);
        assert_eq!(run.path_len(), 1);
        assert_eq!(run.session().trigger, TriggerKind::Manual);
        assert!(run.input().is_none());
        assert!(!run.has_exited());
    }

    #[test]
    fn evaluates_against_context() {
        let run = TestRun::new(FlowKind::Voice).with_context(json!({"contact": {"name": "Ann"}}));
        assert_eq!(run.evaluate_template("Hi @contact.name").text, "Hi Ann");

        let run = run.with_evaluator(Upper);
        assert_eq!(run.evaluate_template("hi").text, "HI");
    }

    #[test]
    fn exit_is_recorded() {
        let mut run = TestRun::new(FlowKind::Voice).with_status(RunStatus::Waiting);
        run.exit(RunStatus::Expired);
        assert_eq!(run.status(), RunStatus::Expired);
        assert!(run.has_exited());
    }
}
