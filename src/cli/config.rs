use std::path::Path;

use crate::Result;
use crate::config::Config as ProjectConfig;

/// Prints the resolved configuration
///
/// Defaults are filled in and the step list is validated before printing.
#[derive(Debug, clap::Args)]
#[clap(visible_alias = "cfg", verbatim_doc_comment)]
pub struct Config {
    /// Output format
    #[clap(long, value_parser = ["json", "toml", "yaml"], default_value = "json")]
    format: String,
}

impl Config {
    pub async fn run(&self, config_path: Option<&Path>) -> Result<()> {
        let cfg = ProjectConfig::load(config_path)?;
        cfg.validate(cfg.locale().messages())?;
        match &cfg.path {
            Some(path) => debug!("loaded {}", path.display()),
            None => debug!("no config file found, showing defaults"),
        }
        match self.format.as_str() {
            "json" => println!("{}", serde_json::to_string_pretty(&cfg)?),
            "toml" => println!("{}", toml::to_string_pretty(&cfg)?),
            "yaml" => print!("{}", serde_yaml::to_string(&cfg)?),
            _ => unreachable!("Invalid format"),
        }
        Ok(())
    }
}
