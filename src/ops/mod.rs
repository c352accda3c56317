pub mod aggregate;
pub mod classify;
pub mod detect;
pub mod hierarchy;
pub mod propagate;
pub mod workflow;

pub use propagate::{Outcome, analyze, apply_outcome, handle_transaction};
pub use workflow::{HostContext, NoWorkflow, WorkflowOracle};
