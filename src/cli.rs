// src/cli.rs

use clap::{Parser, ValueEnum};

/// `dagsynth [--config PATH] [--dest-dir DIR] [--seed N] [--log-level LEVEL] [--dry-run]`
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagsynth",
    version,
    about = "Generate random task DAGs for real-time scheduling experiments.",
    long_about = None
)]
pub struct CliArgs {
    /// Generator config (TOML).
    #[arg(long, value_name = "PATH", default_value = "Dagsynth.toml")]
    pub config: String,

    /// Output root; one sub-directory is created per parameter combination.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dest_dir: String,

    /// Seed to use instead of the one in the config file.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Takes precedence over `DAGSYNTH_LOG`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the config and list the combinations without writing any DAG.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
