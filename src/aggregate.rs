//! Folding step outcomes into a verdict.

use crate::Result;
use crate::shell::{CommandExecutor, Output};
use crate::snapshot::Snapshot;
use crate::step::{StepDefinition, StepOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overall {
    Success,
    Fail,
}

#[derive(Debug, Clone, Copy)]
pub struct Decision<'a> {
    pub overall: Overall,
    /// The lowest-index failing step
    pub diagnostic_step: Option<&'a StepDefinition>,
}

/// `outcomes` must be aligned with `steps`.
pub fn decide<'a>(steps: &'a [StepDefinition], outcomes: &[StepOutcome]) -> Decision<'a> {
    debug_assert_eq!(steps.len(), outcomes.len());
    let diagnostic_step = outcomes
        .iter()
        .position(StepOutcome::is_fail)
        .and_then(|idx| steps.get(idx));
    Decision {
        overall: if diagnostic_step.is_some() {
            Overall::Fail
        } else {
            Overall::Success
        },
        diagnostic_step,
    }
}

/// Runs the step's recommended action with output going straight to the
/// terminal. Skip predicates are not consulted.
#[tracing::instrument(level = "info", name = "aggregate.rerun", skip_all, fields(step = %step.id))]
pub async fn rerun_diagnostic<E: CommandExecutor>(
    step: &StepDefinition,
    snapshot: &Snapshot,
    executor: &E,
) -> Result<Option<i32>> {
    let command = step.recommended_action(snapshot);
    info!("$ {command}");
    executor.execute(&command, Output::Inherit).await
}
