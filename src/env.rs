pub use std::env::*;
use std::{path::PathBuf, sync::LazyLock};

pub static TSTW_CONFIG: LazyLock<Option<PathBuf>> = LazyLock::new(|| var_path("TSTW_CONFIG"));
pub static TSTW_LOCALE: LazyLock<Option<String>> = LazyLock::new(|| var("TSTW_LOCALE").ok());
pub static TSTW_LOG: LazyLock<log::LevelFilter> = LazyLock::new(|| {
    var_log_level("TSTW_LOG")
        .or(var_log_level("TSTW_LOG_LEVEL"))
        .unwrap_or(log::LevelFilter::Info)
});
pub static TSTW_LOG_FILE_LEVEL: LazyLock<log::LevelFilter> =
    LazyLock::new(|| var_log_level("TSTW_LOG_FILE_LEVEL").unwrap_or(*TSTW_LOG));
pub static TSTW_LOG_FILE: LazyLock<Option<PathBuf>> = LazyLock::new(|| var_path("TSTW_LOG_FILE"));

// Tracing configuration
pub static TSTW_TRACE: LazyLock<bool> = LazyLock::new(|| var_true("TSTW_TRACE"));
pub static TSTW_JSON: LazyLock<bool> = LazyLock::new(|| var_true("TSTW_JSON"));

/// Locale hint from the operating system, e.g. `ko_KR.UTF-8`
pub static SYSTEM_LOCALE: LazyLock<Option<String>> = LazyLock::new(|| {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|k| var(k).ok())
        .find(|v| !v.is_empty())
});

fn var_path(name: &str) -> Option<PathBuf> {
    var(name).map(PathBuf::from).ok()
}

fn var_log_level(name: &str) -> Option<log::LevelFilter> {
    var(name).ok().and_then(|level| level.parse().ok())
}

fn var_true(name: &str) -> bool {
    var(name)
        .map(|val| val.to_lowercase())
        .map(|val| val == "true" || val == "1")
        .unwrap_or(false)
}
