// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `execshim`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "execshim",
    version,
    about = "Run a command through the task-registry dispatch layer, falling back to host exec.",
    long_about = None
)]
pub struct CliArgs {
    /// Treat COMMAND as an explicit path instead of searching PATH.
    #[arg(long)]
    pub no_search: bool,

    /// Override or add an environment entry (repeatable).
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `EXECSHIM_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command and arguments to run. The first word is the executable name
    /// and becomes argument zero.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
