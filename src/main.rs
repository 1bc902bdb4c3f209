#[macro_use]
extern crate log;

pub use eyre::Result;

mod aggregate;
mod cli;
mod config;
mod diff_stats;
mod env;
mod error;
mod gate;
mod git;
mod logger;
mod message;
mod package_manager;
mod pipeline;
mod project;
mod shell;
mod snapshot;
mod step;
mod trace;
mod ui;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let code = cli::run().await?;
    clx::progress::stop();
    std::process::exit(code);
}
