//! Concurrent dispatch of the configured steps.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::message::Messages;
use crate::shell::CommandExecutor;
use crate::snapshot::Snapshot;
use crate::step::{StepCategory, StepDefinition, StepOutcome};

/// The steps that were dispatched and their outcomes, index for index.
#[derive(Debug)]
pub struct PipelineRun {
    pub steps: Vec<StepDefinition>,
    pub outcomes: Vec<StepOutcome>,
}

/// Drops build steps on an unsafe branch. Order is preserved.
pub fn gate(steps: &[StepDefinition], snapshot: &Snapshot) -> Vec<StepDefinition> {
    steps
        .iter()
        .filter(|step| snapshot.branch_is_safe || step.category != StepCategory::Build)
        .cloned()
        .collect()
}

/// Dispatches every gated step at once and waits for all of them to settle.
///
/// No step cancels another. A task that dies without reporting counts as a
/// failure of its step.
#[tracing::instrument(level = "info", name = "pipeline.execute", skip_all, fields(steps = steps.len()))]
pub async fn execute<E: CommandExecutor>(
    steps: &[StepDefinition],
    snapshot: Arc<Snapshot>,
    executor: Arc<E>,
    msgs: &'static Messages,
) -> PipelineRun {
    let steps = gate(steps, &snapshot);
    let mut set = JoinSet::new();
    for (idx, step) in steps.iter().cloned().enumerate() {
        let snapshot = snapshot.clone();
        let executor = executor.clone();
        set.spawn(async move { (idx, step.run(&snapshot, &*executor, msgs).await) });
    }
    let mut outcomes: Vec<Option<StepOutcome>> = vec![None; steps.len()];
    while let Some(result) = set.join_next().await {
        match result {
            Ok((idx, outcome)) => outcomes[idx] = Some(outcome),
            Err(err) => error!("step task failed: {err}"),
        }
    }
    let outcomes = outcomes
        .into_iter()
        .zip(&steps)
        .map(|(outcome, step)| {
            outcome.unwrap_or_else(|| StepOutcome::Fail {
                message: msgs.step_failed(&step.display_name),
            })
        })
        .collect();
    PipelineRun { steps, outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Locale;
    use crate::shell::fake::FakeExecutor;
    use crate::step::Preset;

    fn msgs() -> &'static Messages {
        Locale::En.messages()
    }

    fn step(id: &str, command: &'static str) -> StepDefinition {
        StepDefinition::new(id, id, move |_| command.to_string())
    }

    fn snapshot(branch_is_safe: bool) -> Arc<Snapshot> {
        Arc::new(Snapshot {
            staged_files: vec!["src/a.ts".into()],
            source_files: vec!["src/a.ts".into()],
            production_source_files: vec!["src/a.ts".into()],
            branch_is_safe,
            ..Default::default()
        })
    }

    #[test]
    fn test_gate_drops_build_steps_on_unsafe_branch() {
        let steps: Vec<_> = [Preset::BranchChecking, Preset::Build, Preset::Test]
            .into_iter()
            .map(|p| p.definition(msgs()))
            .collect();
        let ids = |steps: Vec<StepDefinition>| steps.into_iter().map(|s| s.id).collect::<Vec<_>>();
        assert_eq!(
            ids(gate(&steps, &snapshot(false))),
            vec!["BRANCH_CHECKING", "TEST"]
        );
        assert_eq!(
            ids(gate(&steps, &snapshot(true))),
            vec!["BRANCH_CHECKING", "BUILD", "TEST"]
        );
    }

    #[tokio::test]
    async fn test_outcomes_follow_step_order_not_completion_order() {
        let steps = vec![
            step("SLOW", "slow"),
            step("FAILING", "failing"),
            step("FAST", "fast"),
        ];
        let executor = Arc::new(
            FakeExecutor::default()
                .delay("slow", 60)
                .delay("failing", 30)
                .exit("failing", 2),
        );
        let run = execute(&steps, snapshot(true), executor.clone(), msgs()).await;
        assert_eq!(executor.finished(), vec!["fast", "failing", "slow"]);
        assert_eq!(
            run.outcomes,
            vec![
                StepOutcome::Success,
                StepOutcome::Fail {
                    message: "failing".into()
                },
                StepOutcome::Success,
            ]
        );
    }

    #[tokio::test]
    async fn test_all_steps_dispatched_before_any_settles() {
        let steps = vec![step("A", "a"), step("B", "b"), step("C", "c")];
        let executor = Arc::new(
            FakeExecutor::default()
                .delay("a", 30)
                .delay("b", 30)
                .delay("c", 30)
                .exit("a", 1),
        );
        let run = execute(&steps, snapshot(true), executor.clone(), msgs()).await;
        let mut calls = executor.calls();
        calls.sort();
        assert_eq!(calls, vec!["a", "b", "c"]);
        assert_eq!(run.outcomes.len(), 3);
        assert!(run.outcomes[0].is_fail());
    }

    #[tokio::test]
    async fn test_gated_steps_are_never_dispatched() {
        let steps: Vec<_> = [Preset::BranchChecking, Preset::Build]
            .into_iter()
            .map(|p| p.definition(msgs()))
            .collect();
        let snapshot = Arc::new(Snapshot {
            available_commands: ["build".to_string()].into_iter().collect(),
            ..(*snapshot(false)).clone()
        });
        let executor = Arc::new(FakeExecutor::default());
        let run = execute(&steps, snapshot, executor.clone(), msgs()).await;
        assert_eq!(run.steps.len(), 1);
        assert_eq!(executor.calls(), vec!["exit 1"]);
    }

    #[tokio::test]
    async fn test_empty_pipeline() {
        let executor = Arc::new(FakeExecutor::default());
        let run = execute(&[], snapshot(true), executor, msgs()).await;
        assert!(run.steps.is_empty());
        assert!(run.outcomes.is_empty());
    }
}
