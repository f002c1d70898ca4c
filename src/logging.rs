// src/logging.rs

//! `tracing` subscriber setup.
//!
//! The filter directive comes from `--log-level` when given, otherwise from
//! `DAGSYNTH_LOG`, which accepts full `EnvFilter` syntax such as
//! `info,dagsynth::builder=debug`. Without either, `info` is used.
//!
//! Logs go to stderr so that `--dry-run` output on stdout stays clean.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "DAGSYNTH_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let directive = filter_directive(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref());
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter '{directive}' (from {LOG_ENV_VAR})"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))
}

/// Filter directive for the CLI flag and the environment value.
///
/// A blank environment value counts as unset.
pub fn filter_directive(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return level.as_str().to_string();
    }
    match env_value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => DEFAULT_DIRECTIVE.to_string(),
    }
}
