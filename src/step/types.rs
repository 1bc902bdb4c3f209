//! Core type definitions for steps.
//!
//! - [`StepDefinition`] - An immutable description of one verification unit
//! - [`StepCategory`] - Whether the branch gate applies to the step
//! - [`StepOutcome`] - The result of running a step once

use std::fmt;
use std::sync::Arc;

use crate::Result;
use crate::snapshot::Snapshot;

/// Computes a command line from the snapshot.
pub type CommandFn = Arc<dyn Fn(&Snapshot) -> String + Send + Sync>;
/// Returns true when a step does not apply to the snapshot.
pub type SkipPredicate = Arc<dyn Fn(&Snapshot) -> bool + Send + Sync>;
/// Side effect run after a step succeeds.
pub type PostAction = Arc<dyn Fn(&Snapshot) -> Result<()> + Send + Sync>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StepCategory {
    #[default]
    Check,
    /// Dropped from the pipeline entirely on an unsafe branch.
    Build,
}

/// How a step turned out. `Fail` carries the text shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, strum::EnumIs)]
pub enum StepOutcome {
    Success,
    Skip,
    Fail { message: String },
}

#[derive(Clone)]
pub struct StepDefinition {
    /// Preset identifier, e.g. `BUILD`
    pub id: String,
    pub display_name: String,
    pub emoji: Option<String>,
    pub category: StepCategory,
    pub expected_exit_code: i32,
    command_of: CommandFn,
    recommended_action_of: Option<CommandFn>,
    error_message_of: Option<CommandFn>,
    skip_predicates: Option<Vec<SkipPredicate>>,
    post_action: Option<PostAction>,
}

impl StepDefinition {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        command_of: impl Fn(&Snapshot) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            emoji: None,
            category: StepCategory::Check,
            expected_exit_code: 0,
            command_of: Arc::new(command_of),
            recommended_action_of: None,
            error_message_of: None,
            skip_predicates: None,
            post_action: None,
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn with_category(mut self, category: StepCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_expected_exit_code(mut self, code: i32) -> Self {
        self.expected_exit_code = code;
        self
    }

    pub fn with_recommended_action(
        mut self,
        f: impl Fn(&Snapshot) -> String + Send + Sync + 'static,
    ) -> Self {
        self.recommended_action_of = Some(Arc::new(f));
        self
    }

    pub fn with_error_message(
        mut self,
        f: impl Fn(&Snapshot) -> String + Send + Sync + 'static,
    ) -> Self {
        self.error_message_of = Some(Arc::new(f));
        self
    }

    pub fn with_skip_predicates(mut self, predicates: Vec<SkipPredicate>) -> Self {
        self.skip_predicates = Some(predicates);
        self
    }

    pub fn with_post_action(mut self, action: PostAction) -> Self {
        self.post_action = Some(action);
        self
    }

    /// Replaces the command with a literal string. Every other attribute,
    /// including the recommended action, is inherited.
    pub fn with_command_override(mut self, command: String) -> Self {
        self.command_of = Arc::new(move |_: &Snapshot| command.clone());
        self
    }

    /// Name shown in progress lines, prefixed with the emoji when present.
    pub fn name(&self) -> String {
        match &self.emoji {
            Some(emoji) => format!("{emoji} {}", self.display_name),
            None => self.display_name.clone(),
        }
    }

    pub fn command(&self, snapshot: &Snapshot) -> String {
        (self.command_of)(snapshot)
    }

    /// The command a human should run to see the failure, falling back to
    /// [`Self::command`].
    pub fn recommended_action(&self, snapshot: &Snapshot) -> String {
        match &self.recommended_action_of {
            Some(f) => f(snapshot),
            None => self.command(snapshot),
        }
    }

    pub fn failure_message(&self, snapshot: &Snapshot) -> String {
        match &self.error_message_of {
            Some(f) => f(snapshot),
            None => self.recommended_action(snapshot),
        }
    }

    /// Evaluates every predicate and ORs the results. No predicates, or an
    /// empty list, never skips.
    pub fn should_skip(&self, snapshot: &Snapshot) -> bool {
        self.skip_predicates
            .iter()
            .flatten()
            .map(|predicate| predicate(snapshot))
            .fold(false, |skip, p| skip || p)
    }

    pub(crate) fn post_action_fn(&self) -> Option<PostAction> {
        self.post_action.clone()
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("category", &self.category)
            .field("expected_exit_code", &self.expected_exit_code)
            .field(
                "skip_predicates",
                &self.skip_predicates.as_ref().map(|p| p.len()),
            )
            .field("post_action", &self.post_action.is_some())
            .finish()
    }
}

impl fmt::Display for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
