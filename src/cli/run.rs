use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::gate::Gate;
use crate::message::Locale;
use crate::shell::ShellExecutor;
use crate::snapshot::Snapshot;
use crate::{Result, git, logger};

/// Runs the configured steps against the staged changes
///
/// Exits 1 when a step fails, after re-running the first failing step with
/// its output visible.
#[derive(Debug, Default, clap::Args)]
#[clap(verbatim_doc_comment)]
pub struct Run {
    /// Message language, e.g. en-US, ko-KR, ja-JP
    #[clap(long, value_name = "LOCALE")]
    locale: Option<Locale>,
}

impl Run {
    pub async fn run(&self, config_path: Option<&Path>) -> Result<i32> {
        let mut config = Config::load(config_path)?;
        if let Some(locale) = self.locale {
            config.locale = Some(locale);
        }
        if config.verbose {
            logger::raise_level(log::LevelFilter::Debug);
        }
        let msgs = config.locale().messages();
        let steps = config.resolve_steps(msgs)?;

        let root = git::find_root()?;
        std::env::set_current_dir(&root)?;
        let snapshot = Snapshot::collect(&config, &root, msgs)?;
        if !snapshot.staged_files.is_empty() {
            snapshot.diff_stats.report(msgs);
        }

        let gate = Gate::new(Arc::new(ShellExecutor::default()), msgs);
        let verdict = gate.run(snapshot, &steps).await;
        Ok(verdict.exit_code())
    }
}
