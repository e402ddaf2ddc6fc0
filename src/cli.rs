// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `invoicebot`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "invoicebot",
    version,
    about = "Generate the monthly invoice and email it to the client.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Invoicebot.toml` in the current working directory.
    #[arg(long, global = true, value_name = "PATH", default_value = "Invoicebot.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `INVOICEBOT_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Authorize the trigger, then provision, install, generate and send.
    Run(RunArgs),

    /// Print the next invoice's date, number and service period.
    Plan,

    /// Validate the config and print what a run would do.
    Check,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Event that started the run: `schedule`, `workflow_dispatch`, ...
    #[arg(long, env = "GITHUB_EVENT_NAME", value_name = "EVENT")]
    pub event: String,

    /// Identity of whoever started the run.
    #[arg(long, env = "GITHUB_ACTOR", value_name = "NAME", default_value = "")]
    pub actor: String,

    /// Evaluate the authorization gate and print the steps, without running
    /// any command or sending mail.
    #[arg(long)]
    pub dry_run: bool,
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
