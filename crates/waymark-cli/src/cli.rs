//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

/// CLI tool for the waymark location SDK.
#[derive(Parser, Debug)]
#[command(name = "waymark")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report the current (simulated) location once
    Once(OnceArgs),
    /// Report the location continuously until interrupted
    Watch(WatchArgs),
}

/// Connection options shared by every command.
#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Base URL of the location service
    #[arg(long, env = "WAYMARK_API_URL")]
    pub api_url: String,

    /// API key for the initial authentication
    #[arg(long, env = "WAYMARK_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Starting latitude for the simulated walk
    #[arg(long, default_value_t = 52.520)]
    pub latitude: f64,

    /// Starting longitude for the simulated walk
    #[arg(long, default_value_t = 13.405)]
    pub longitude: f64,
}

#[derive(Args, Debug)]
pub struct OnceArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Update interval in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub interval_ms: u64,
}
