//! Progress lines for step execution.
//!
//! Each dispatched step owns one line that moves from pending to skipped,
//! done, or failed.

use clx::progress::{ProgressJob, ProgressJobBuilder, ProgressJobDoneBehavior, ProgressStatus};
use std::sync::Arc;

use super::types::StepDefinition;
use crate::ui::style;

impl StepDefinition {
    pub(crate) fn build_step_progress(&self) -> Arc<ProgressJob> {
        ProgressJobBuilder::new()
            .body("{{spinner()}} {{name | flex}}{% if message %} – {{message | flex}}{% endif %}")
            .body_text(Some(
                "{{spinner()}} {{name}}{% if message %} – {{message}}{% endif %}",
            ))
            .prop("name", &self.name())
            .status(ProgressStatus::Pending)
            .on_done(ProgressJobDoneBehavior::Keep)
            .start()
    }
}

pub(crate) fn mark_running(progress: &ProgressJob, command: &str) {
    progress.prop("message", &style::edim(command).to_string());
    progress.set_status(ProgressStatus::Running);
}

pub(crate) fn mark_skipped(progress: &ProgressJob) {
    progress.prop("message", &"skipped");
    progress.set_status(ProgressStatus::DoneCustom(
        style::eblue("⇢").bold().to_string(),
    ));
}

pub(crate) fn mark_done(progress: &ProgressJob) {
    progress.prop("message", &"");
    progress.set_status(ProgressStatus::Done);
}

pub(crate) fn mark_failed(progress: &ProgressJob, message: &str) {
    progress.prop("message", &style::ered(message).to_string());
    progress.set_status(ProgressStatus::Failed);
}
