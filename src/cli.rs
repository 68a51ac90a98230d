//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// signaldesk - proxy and terminal dashboard for post-driven trade signals.
#[derive(Parser, Debug)]
#[command(name = "signaldesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "SIGNALDESK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP proxy in front of the trading backend
    Serve {
        /// Address to listen on (overrides server.bind_addr)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Open the terminal dashboard
    Dashboard {
        /// Proxy API base URL (overrides feed.api_url)
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}
