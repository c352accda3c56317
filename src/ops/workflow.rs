use crate::model::config::{IndentSettings, Policy};
use crate::model::document::Document;

/// Answers whether a completed-looking task is really finished, or only
/// finished with the current stage of a multi-stage workflow.
pub trait WorkflowOracle {
    fn is_final_stage_or_not_workflow(
        &self,
        line_text: &str,
        line_number: usize,
        doc: &Document,
        policy: &Policy,
    ) -> bool;
}

/// Oracle for hosts without workflow support: every task is final
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWorkflow;

impl WorkflowOracle for NoWorkflow {
    fn is_final_stage_or_not_workflow(&self, _: &str, _: usize, _: &Document, _: &Policy) -> bool {
        true
    }
}

impl<F> WorkflowOracle for F
where
    F: Fn(&str, usize, &Document, &Policy) -> bool,
{
    fn is_final_stage_or_not_workflow(
        &self,
        line_text: &str,
        line_number: usize,
        doc: &Document,
        policy: &Policy,
    ) -> bool {
        self(line_text, line_number, doc, policy)
    }
}

/// What the host editor supplies alongside each transaction
#[derive(Clone, Copy)]
pub struct HostContext<'a> {
    pub indent: IndentSettings,
    pub workflow: &'a dyn WorkflowOracle,
}

impl<'a> HostContext<'a> {
    pub fn new(indent: IndentSettings, workflow: &'a dyn WorkflowOracle) -> Self {
        HostContext { indent, workflow }
    }
}

impl HostContext<'static> {
    /// Host without workflow support
    pub fn plain(indent: IndentSettings) -> Self {
        HostContext {
            indent,
            workflow: &NoWorkflow,
        }
    }
}

impl std::fmt::Debug for HostContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("indent", &self.indent)
            .finish_non_exhaustive()
    }
}
