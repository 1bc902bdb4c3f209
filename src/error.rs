use std::path::PathBuf;

/// Errors raised while turning configuration into runnable steps.
///
/// These are all detected before any step is dispatched.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unknown step '{name}', expected one of: {}", .valid.join(", "))]
    UnknownPreset { name: String, valid: Vec<String> },
    #[error("step '{preset}' has a malformed override command: {reason}")]
    MalformedOverride { preset: String, reason: String },
    #[error("invalid unsafe branch pattern '{pattern}'")]
    InvalidBranchPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unsupported config file extension: {}", .0.display())]
    UnsupportedConfig(PathBuf),
}
