use crate::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the tracing subscriber used by `--trace`.
///
/// Spans and events go to stderr, or to stdout as JSON Lines with `json`.
/// `log` records are forwarded so existing `debug!`/`info!` calls show up
/// inside their spans.
pub fn init_tracing(json_output: bool) -> Result<()> {
    use tracing_subscriber::prelude::*;

    // Fails only when a logger is already installed, in which case log
    // records keep going to that logger instead.
    if tracing_log::LogTracer::init().is_err() {
        debug!("log records will not be forwarded to tracing");
    }

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("TSTW_TRACE_FILTER")
        .from_env_lossy();

    let result = if json_output {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stdout);
        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_timer(fmt::time::uptime())
            .with_ansi(console::Term::stderr().features().colors_supported())
            .with_span_events(fmt::format::FmtSpan::CLOSE)
            .compact();
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
    };
    result.map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {e}"))
}
