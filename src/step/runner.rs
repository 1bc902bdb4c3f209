//! Single step execution.
//!
//! A step run never returns an error: skips and failures are outcomes.

use std::sync::Arc;

use super::progress;
use super::types::{StepDefinition, StepOutcome};
use crate::message::Messages;
use crate::shell::{CommandExecutor, Output};
use crate::snapshot::Snapshot;

impl StepDefinition {
    /// Runs the step once against `snapshot`.
    ///
    /// A skipped step never computes its command or runs its post-action.
    /// The post-action only runs when the exit code matches
    /// `expected_exit_code`, and its own failure is logged without changing
    /// the outcome.
    #[tracing::instrument(level = "info", name = "step.run", skip_all, fields(step = %self.id))]
    pub async fn run<E: CommandExecutor>(
        &self,
        snapshot: &Arc<Snapshot>,
        executor: &E,
        msgs: &Messages,
    ) -> StepOutcome {
        let pr = self.build_step_progress();
        if self.should_skip(snapshot) {
            debug!("{self}: skipped");
            progress::mark_skipped(&pr);
            return StepOutcome::Skip;
        }
        let command = self.command(snapshot);
        if snapshot.verbose {
            info!("{self}: $ {command}");
        } else {
            debug!("{self}: $ {command}");
        }
        progress::mark_running(&pr, &command);
        let code = match executor
            .execute(&command, Output::Progress(pr.clone()))
            .await
        {
            Ok(code) => code,
            Err(err) => {
                warn!("{self}: failed to start: {err:#}");
                None
            }
        };
        if code != Some(self.expected_exit_code) {
            debug!(
                "{self}: exited with {code:?}, expected {}",
                self.expected_exit_code
            );
            let message = self.failure_message(snapshot);
            progress::mark_failed(
                &pr,
                &format!("{} > {message}", msgs.step_failed(&self.display_name)),
            );
            return StepOutcome::Fail { message };
        }
        if let Some(action) = self.post_action_fn() {
            let snapshot = snapshot.clone();
            match tokio::task::spawn_blocking(move || action(&snapshot)).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!("{self}: post-action failed: {err:#}"),
                Err(err) => warn!("{self}: post-action did not complete: {err}"),
            }
        }
        progress::mark_done(&pr);
        StepOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Locale;
    use crate::shell::fake::FakeExecutor;
    use crate::step::types::{PostAction, SkipPredicate};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn msgs() -> &'static Messages {
        Locale::En.messages()
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn counted_post_action(count: &Arc<AtomicUsize>) -> PostAction {
        let count = count.clone();
        Arc::new(move |_: &Snapshot| -> crate::Result<()> {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn counted_step(commands: &Arc<AtomicUsize>, command: &'static str) -> StepDefinition {
        let commands = commands.clone();
        StepDefinition::new("FORMAT", "Format", move |_| {
            commands.fetch_add(1, Ordering::SeqCst);
            command.to_string()
        })
    }

    #[tokio::test]
    async fn test_skipped_step_never_computes_command() {
        let commands = counter();
        let post = counter();
        let never: SkipPredicate = Arc::new(|_: &Snapshot| false);
        let always: SkipPredicate = Arc::new(|_: &Snapshot| true);
        let step = counted_step(&commands, "prettier --write")
            .with_skip_predicates(vec![never, always])
            .with_post_action(counted_post_action(&post));
        let executor = FakeExecutor::default();
        let outcome = step
            .run(&Arc::new(Snapshot::default()), &executor, msgs())
            .await;
        assert_eq!(outcome, StepOutcome::Skip);
        assert_eq!(commands.load(Ordering::SeqCst), 0);
        assert_eq!(post.load(Ordering::SeqCst), 0);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_success_runs_post_action_once() {
        let commands = counter();
        let post = counter();
        let step = counted_step(&commands, "prettier --write")
            .with_post_action(counted_post_action(&post));
        let executor = FakeExecutor::default();
        let outcome = step
            .run(&Arc::new(Snapshot::default()), &executor, msgs())
            .await;
        assert_eq!(outcome, StepOutcome::Success);
        assert_eq!(commands.load(Ordering::SeqCst), 1);
        assert_eq!(post.load(Ordering::SeqCst), 1);
        assert_eq!(executor.calls(), vec!["prettier --write"]);
    }

    #[tokio::test]
    async fn test_failure_skips_post_action() {
        let post = counter();
        let step = StepDefinition::new("LINT", "Lint", |_| "eslint .".into())
            .with_recommended_action(|_| "eslint . --debug".into())
            .with_post_action(counted_post_action(&post));
        let executor = FakeExecutor::default().exit("eslint .", 1);
        let outcome = step
            .run(&Arc::new(Snapshot::default()), &executor, msgs())
            .await;
        assert_eq!(
            outcome,
            StepOutcome::Fail {
                message: "eslint . --debug".into()
            }
        );
        assert_eq!(post.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expected_exit_code() {
        let snapshot = Arc::new(Snapshot::default());
        let step = StepDefinition::new("GREP", "Grep", |_| "grep -q TODO".into())
            .with_expected_exit_code(1);
        let executor = FakeExecutor::default().exit("grep -q TODO", 1);
        assert_eq!(
            step.run(&snapshot, &executor, msgs()).await,
            StepOutcome::Success
        );
        let executor = FakeExecutor::default();
        assert!(step.run(&snapshot, &executor, msgs()).await.is_fail());
    }

    #[tokio::test]
    async fn test_spawn_failure_is_a_step_failure() {
        let step = StepDefinition::new("TSC", "Types", |_| "tsc".into())
            .with_error_message(|_| "type errors".into());
        let executor = FakeExecutor::default().unspawnable("tsc");
        let outcome = step
            .run(&Arc::new(Snapshot::default()), &executor, msgs())
            .await;
        assert_eq!(
            outcome,
            StepOutcome::Fail {
                message: "type errors".into()
            }
        );
    }

    #[tokio::test]
    async fn test_post_action_error_keeps_success() {
        let step = StepDefinition::new("FORMAT", "Format", |_| "prettier".into())
            .with_post_action(Arc::new(|_: &Snapshot| -> crate::Result<()> {
                eyre::bail!("index.lock exists")
            }));
        let executor = FakeExecutor::default();
        let outcome = step
            .run(&Arc::new(Snapshot::default()), &executor, msgs())
            .await;
        assert_eq!(outcome, StepOutcome::Success);
    }
}
