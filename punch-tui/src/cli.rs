use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "punch-tui")]
#[command(about = "Kiosk terminal client for the NW time-clock service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub overrides: Overrides,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the configured time-clock service (default)
    Run,
    /// Run against an in-process dev backend, no network
    Dev,
    /// Print config path and create default file if missing
    ConfigPath,
}

/// Command-line settings that take precedence over file and environment.
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Time-clock service host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Time-clock service port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Connect without TLS
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Member id to clock for
    #[arg(long, global = true)]
    pub member: Option<i32>,
}
