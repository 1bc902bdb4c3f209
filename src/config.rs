use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::Error;
use crate::message::{Locale, Messages};
use crate::package_manager::PackageManager;
use crate::snapshot::BranchPolicy;
use crate::step::{Preset, StepDefinition};
use crate::{Result, env};
use eyre::WrapErr;

/// File names searched for in the current directory and its parents.
const CONFIG_FILES: &[&str] = &["tstw.config.json", "tstw.toml", "tstw.yaml", "tstw.yml"];

/// One entry of the configured step list: a preset id, or a preset id paired
/// with a literal command that replaces the preset's command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StepEntry {
    Preset(String),
    Override(String, String),
}

impl StepEntry {
    pub fn preset_id(&self) -> &str {
        match self {
            StepEntry::Preset(id) | StepEntry::Override(id, _) => id,
        }
    }
}

impl From<Preset> for StepEntry {
    fn from(preset: Preset) -> Self {
        StepEntry::Preset(preset.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub steps: Vec<StepEntry>,
    #[serde(alias = "unSafeBranchList")]
    pub unsafe_branches: Vec<String>,
    #[serde(alias = "sourceDir")]
    pub source_dirs: Vec<String>,
    pub verbose: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManager>,
    pub source_extensions: Vec<String>,
    pub tooling_patterns: Vec<String>,
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steps: Preset::selectable().map(StepEntry::from).collect(),
            unsafe_branches: vec!["main".into(), "master".into()],
            source_dirs: vec!["src".into()],
            verbose: false,
            locale: None,
            package_manager: None,
            source_extensions: [".ts", ".tsx", ".mts", ".mtsx"]
                .into_iter()
                .map(String::from)
                .collect(),
            tooling_patterns: vec!["husky".into()],
            path: None,
        }
    }
}

impl Config {
    /// Loads the project config, preferring `explicit`, then `TSTW_CONFIG`,
    /// then the first config file found walking up from the cwd.
    #[tracing::instrument(level = "info", name = "config.load")]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit.or(env::TSTW_CONFIG.as_deref()) {
            return Self::read(path)
                .wrap_err_with(|| format!("Failed to read config file: {}", path.display()));
        }
        let mut cwd = std::env::current_dir()?;
        loop {
            for name in CONFIG_FILES {
                let path = cwd.join(name);
                if path.exists() {
                    return Self::read(&path).wrap_err_with(|| {
                        format!("Failed to read config file: {}", path.display())
                    });
                }
            }
            if !cwd.pop() {
                break;
            }
        }
        debug!("No config file found, using default");
        Ok(Config::default())
    }

    #[tracing::instrument(level = "info", name = "config.read", skip_all, fields(path = %path.display()))]
    fn read(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let mut config: Config = match ext {
            "toml" => {
                let raw = xx::file::read_to_string(path)?;
                toml::from_str(&raw)?
            }
            "yaml" | "yml" => {
                let raw = xx::file::read_to_string(path)?;
                serde_yaml::from_str(&raw)?
            }
            "json" => {
                let raw = xx::file::read_to_string(path)?;
                serde_json::from_str(&raw)?
            }
            _ => return Err(Error::UnsupportedConfig(path.to_path_buf()).into()),
        };
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Explicit config or `TSTW_LOCALE` wins over the system locale.
    pub fn locale(&self) -> Locale {
        let from_env = env::TSTW_LOCALE
            .as_deref()
            .and_then(|l| Locale::from_str(l).ok());
        Locale::resolve(self.locale.or(from_env), env::SYSTEM_LOCALE.as_deref())
    }

    /// Turns the configured step list into definitions, rejecting unknown
    /// preset ids and malformed override commands.
    pub fn resolve_steps(&self, msgs: &Messages) -> Result<Vec<StepDefinition>> {
        let mut steps = Vec::with_capacity(self.steps.len());
        for entry in &self.steps {
            let id = entry.preset_id();
            let preset = Preset::from_str(id).map_err(|_| Error::UnknownPreset {
                name: id.to_string(),
                valid: Preset::all().map(|p| p.to_string()).collect(),
            })?;
            let step = preset.definition(msgs);
            let step = match entry {
                StepEntry::Preset(_) => step,
                StepEntry::Override(_, command) => {
                    check_override(id, command)?;
                    step.with_command_override(command.clone())
                }
            };
            steps.push(step);
        }
        Ok(steps)
    }

    /// Checks everything that can be rejected without touching the repository.
    pub fn validate(&self, msgs: &Messages) -> Result<()> {
        self.resolve_steps(msgs)?;
        BranchPolicy::new(&self.unsafe_branches)?;
        Ok(())
    }
}

fn check_override(preset: &str, command: &str) -> Result<()> {
    let malformed = |reason: &str| Error::MalformedOverride {
        preset: preset.to_string(),
        reason: reason.to_string(),
    };
    if command.trim().is_empty() {
        return Err(malformed("command is empty").into());
    }
    shell_words::split(command).map_err(|e| malformed(&e.to_string()))?;
    Ok(())
}
