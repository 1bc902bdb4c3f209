use std::path::Path;

use itertools::Itertools;

use crate::Result;
use crate::config::Config;
use crate::step::{Preset, StepCategory};

/// Lists the built-in steps that can appear in `steps`
#[derive(Debug, clap::Args)]
pub struct Presets {
    /// Include presets that only exist for testing
    #[clap(short, long)]
    all: bool,
}

impl Presets {
    pub async fn run(&self, config_path: Option<&Path>) -> Result<()> {
        let msgs = Config::load(config_path)?.locale().messages();
        let presets = if self.all {
            Preset::all().collect_vec()
        } else {
            Preset::selectable().collect_vec()
        };
        let width = presets.iter().map(|p| p.to_string().len()).max().unwrap_or(0);
        for preset in presets {
            let step = preset.definition(msgs);
            let mut line = format!("{:<width$}  {}", preset.to_string(), step.name());
            if step.category == StepCategory::Build {
                line.push_str(" (skipped on unsafe branches)");
            }
            println!("{line}");
        }
        Ok(())
    }
}
