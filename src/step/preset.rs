//! The closed set of built-in steps.

use crate::message::Messages;
use crate::snapshot::Snapshot;

use super::post_action;
use super::skip;
use super::types::{StepCategory, StepDefinition};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Preset {
    /// Fails unconditionally; only useful for exercising the failure path.
    #[strum(to_string = "_ALWAYS_FAILING_ONLY_FOR_TESTING")]
    AlwaysFailing,
    BranchChecking,
    FormatTypescriptFiles,
    EslintChecking,
    TypeChecking,
    Build,
    Test,
}

impl Preset {
    pub fn all() -> impl Iterator<Item = Preset> {
        <Preset as strum::IntoEnumIterator>::iter()
    }

    /// Presets offered to users, in their default order.
    pub fn selectable() -> impl Iterator<Item = Preset> {
        Self::all().filter(|p| *p != Preset::AlwaysFailing)
    }

    pub fn definition(self, msgs: &Messages) -> StepDefinition {
        let id = self.to_string();
        match self {
            Preset::AlwaysFailing => {
                StepDefinition::new(id, msgs.always_failing, |_| {
                    r#"echo "error" && exit 123"#.to_string()
                })
                .with_emoji("🚨")
            }
            Preset::BranchChecking => {
                let error = msgs.branch_checking_error;
                StepDefinition::new(id, msgs.branch_checking, |s| {
                    format!("exit {}", if s.branch_is_safe { 0 } else { 1 })
                })
                .with_emoji("🌲")
                .with_error_message(move |_| error.to_string())
            }
            Preset::FormatTypescriptFiles => StepDefinition::new(id, msgs.format_source_files, |s| {
                format!(
                    "{} prettier --write --log-level silent {}",
                    s.package_manager.executor(),
                    quoted_files(s)
                )
            })
            .with_emoji("💅")
            .with_recommended_action(|s| {
                format!(
                    "{} prettier --write {}",
                    s.package_manager.executor(),
                    quoted_files(s)
                )
            })
            .with_skip_predicates(vec![skip::no_source_files()])
            .with_post_action(post_action::restage_source_files()),
            Preset::EslintChecking => StepDefinition::new(id, msgs.lint_checking, |s| {
                format!(
                    "{} eslint --ext .ts --ext .tsx --ext .mts --ext .mtsx {} --fix",
                    s.package_manager.executor(),
                    shell_words::join(&s.source_dirs)
                )
            })
            .with_emoji("📏")
            .with_skip_predicates(vec![skip::no_production_source_files()]),
            Preset::TypeChecking => StepDefinition::new(id, msgs.type_checking, |s| {
                format!("{} tsc -p . --noEmit", s.package_manager.executor())
            })
            .with_emoji("🔍")
            .with_skip_predicates(vec![skip::no_production_source_files()]),
            Preset::Build => StepDefinition::new(id, msgs.build_checking, |s| {
                format!("{} run build", s.package_manager)
            })
            .with_emoji("🏗️")
            .with_category(StepCategory::Build)
            .with_skip_predicates(vec![
                skip::no_production_source_files(),
                skip::no_command("build"),
            ]),
            Preset::Test => StepDefinition::new(id, msgs.execute_test, |s| {
                format!("{} run test", s.package_manager)
            })
            .with_emoji("🧪")
            .with_skip_predicates(vec![
                skip::no_production_source_files(),
                skip::no_command("test"),
                skip::no_test_files(),
            ]),
        }
    }
}

fn quoted_files(snapshot: &Snapshot) -> String {
    shell_words::join(&snapshot.source_files)
}
