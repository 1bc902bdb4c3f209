use std::path::PathBuf;

use crate::{Result, env, logger};
use clap::Parser;
use clx::progress::ProgressOutput;

mod config;
mod init;
mod presets;
mod run;

#[derive(clap::Parser)]
#[clap(name = "tstw", version = env!("CARGO_PKG_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
struct Cli {
    /// Path to the project configuration file
    #[clap(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Enables verbose output
    #[clap(short, long, global = true, action = clap::ArgAction::Count, overrides_with_all = ["quiet", "silent"])]
    verbose: u8,
    /// Disables progress output
    #[clap(short, long, global = true)]
    no_progress: bool,
    /// Suppresses output
    #[clap(short, long, global = true, overrides_with_all = ["verbose", "silent"])]
    quiet: bool,
    /// Suppresses all output
    #[clap(long, global = true, overrides_with_all = ["quiet", "verbose"])]
    silent: bool,
    /// Enable tracing spans and performance diagnostics
    #[clap(long, global = true)]
    trace: bool,
    /// Output traces as JSON Lines (requires --trace)
    #[clap(long, global = true, requires = "trace")]
    json: bool,
    /// Defaults to `run`
    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    Config(Box<config::Config>),
    Init(Box<init::Init>),
    Presets(Box<presets::Presets>),
    Run(Box<run::Run>),
}

/// Parses arguments, runs the subcommand and returns the process exit code.
pub async fn run() -> Result<i32> {
    let args = Cli::parse();

    // Tracing has to be installed before anything logs.
    let trace_enabled = args.trace || *env::TSTW_TRACE;
    if trace_enabled {
        crate::trace::init_tracing(args.json || *env::TSTW_JSON)?;
    }

    let mut level = None;
    if !console::user_attended_stderr() || args.no_progress {
        clx::progress::set_output(ProgressOutput::Text);
    }
    if args.verbose > 1 || log::log_enabled!(log::Level::Trace) {
        clx::progress::set_output(ProgressOutput::Text);
        level = Some(log::LevelFilter::Trace);
    }
    if args.verbose == 1 || log::log_enabled!(log::Level::Debug) {
        clx::progress::set_output(ProgressOutput::Text);
        level = Some(log::LevelFilter::Debug);
    }
    if args.quiet {
        clx::progress::set_output(ProgressOutput::Text);
        level = Some(log::LevelFilter::Warn);
    }
    if args.silent {
        clx::progress::set_output(ProgressOutput::Text);
        level = Some(log::LevelFilter::Error);
    }
    if !trace_enabled {
        logger::init(level);
    }

    let config_path = args.config.as_deref();
    match args.command.unwrap_or_else(|| Commands::Run(Box::default())) {
        Commands::Config(cmd) => cmd.run(config_path).await.map(|()| 0),
        Commands::Init(cmd) => cmd.run().await.map(|()| 0),
        Commands::Presets(cmd) => cmd.run(config_path).await.map(|()| 0),
        Commands::Run(cmd) => cmd.run(config_path).await,
    }
}
