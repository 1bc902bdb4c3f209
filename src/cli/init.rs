use std::path::{Path, PathBuf};

use crate::Result;
use crate::config::Config;
use crate::package_manager::PackageManager;

const CONFIG_FILE: &str = "tstw.config.json";

/// Writes a tstw.config.json with the default steps
#[derive(Debug, clap::Args)]
pub struct Init {
    /// Overwrite an existing tstw.config.json
    #[clap(short, long)]
    force: bool,
}

impl Init {
    pub async fn run(&self) -> Result<()> {
        let path = PathBuf::from(CONFIG_FILE);
        if path.exists() && !self.force {
            warn!("{CONFIG_FILE} already exists, run with --force to overwrite");
            return Ok(());
        }
        let root = std::env::current_dir()?;
        xx::file::write(&path, default_config(&root)?)?;
        println!("Created {CONFIG_FILE}");
        Ok(())
    }
}

/// The default config, with the package manager pinned when a lockfile
/// identifies it.
fn default_config(root: &Path) -> Result<String> {
    let config = Config {
        package_manager: PackageManager::detect(root),
        ..Default::default()
    };
    Ok(serde_json::to_string_pretty(&config)? + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StepEntry;
    use crate::message::Locale;

    #[test]
    fn test_default_config_loads_back() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("bun.lock"), "").unwrap();
        let raw = default_config(tmp.path()).unwrap();
        let config: Config = serde_json::from_str(&raw).unwrap();
        assert_eq!(config.package_manager, Some(PackageManager::Bun));
        assert_eq!(config.steps[0], StepEntry::Preset("BRANCH_CHECKING".into()));
        assert_eq!(
            config.resolve_steps(Locale::En.messages()).unwrap().len(),
            6
        );
        assert!(!raw.contains("_ALWAYS_FAILING_ONLY_FOR_TESTING"));
    }

    #[test]
    fn test_default_config_without_lockfile() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = default_config(tmp.path()).unwrap();
        assert!(!raw.contains("package_manager"));
    }
}
