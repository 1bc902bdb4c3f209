//! The commit gate: decides whether a commit may proceed.
//!
//! ```text
//! NoStagedFiles (exit 0)
//! HasStagedFiles -> notices -> Running -> AllPassed (exit 0)
//!                                      -> SomeFailed (exit 1)
//! ```

use std::sync::Arc;

use console::Color;

use crate::aggregate::{self, Overall};
use crate::message::Messages;
use crate::pipeline::{self, PipelineRun};
use crate::shell::CommandExecutor;
use crate::snapshot::Snapshot;
use crate::step::StepDefinition;
use crate::ui;

/// Orange, for the retry notice.
const RETRY_COLOR: Color = Color::Color256(208);

#[derive(Debug)]
pub enum Verdict {
    /// Nothing staged; no step was dispatched.
    NoStagedFiles,
    Passed(PipelineRun),
    /// `diagnostic` is the id of the lowest-index failing step.
    Failed {
        run: PipelineRun,
        diagnostic: String,
    },
}

impl Verdict {
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::NoStagedFiles | Verdict::Passed(_) => 0,
            Verdict::Failed { .. } => 1,
        }
    }
}

pub struct Gate<E> {
    executor: Arc<E>,
    msgs: &'static Messages,
}

impl<E: CommandExecutor> Gate<E> {
    pub fn new(executor: Arc<E>, msgs: &'static Messages) -> Self {
        Self { executor, msgs }
    }

    #[tracing::instrument(level = "info", name = "gate.run", skip_all)]
    pub async fn run(&self, snapshot: Snapshot, steps: &[StepDefinition]) -> Verdict {
        if snapshot.staged_files.is_empty() {
            ui::print_box(self.msgs.no_staged_files, Color::Cyan);
            return Verdict::NoStagedFiles;
        }
        if let Some(notice) = notice(&snapshot, self.msgs) {
            ui::print_box(notice, Color::Cyan);
        }
        let snapshot = Arc::new(snapshot);
        let run = pipeline::execute(steps, snapshot.clone(), self.executor.clone(), self.msgs).await;
        clx::progress::stop();

        let decision = aggregate::decide(&run.steps, &run.outcomes);
        let diagnostic = match (decision.overall, decision.diagnostic_step) {
            (Overall::Fail, Some(step)) => step,
            _ => {
                ui::print_box(self.msgs.can_commit, Color::Green);
                return Verdict::Passed(run);
            }
        };
        ui::print_box(self.msgs.cannot_commit, Color::Red);
        ui::print_box(self.msgs.retry_command, RETRY_COLOR);
        match aggregate::rerun_diagnostic(diagnostic, &snapshot, &*self.executor).await {
            Ok(code) => debug!("{diagnostic}: re-run exited with {code:?}"),
            Err(err) => warn!("{diagnostic}: re-run failed to start: {err:#}"),
        }
        let diagnostic = diagnostic.id.clone();
        Verdict::Failed { run, diagnostic }
    }
}

/// Informational notice when some steps will skip for lack of source files.
fn notice(snapshot: &Snapshot, msgs: &'static Messages) -> Option<&'static str> {
    if snapshot.source_files.is_empty() {
        Some(msgs.no_source_files)
    } else if snapshot.production_source_files.is_empty() {
        Some(msgs.no_production_source_files)
    } else {
        None
    }
}
