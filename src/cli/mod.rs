pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flagfetch")]
#[command(about = "Conditional fetcher for feature flag and segment data", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/flagfetch/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the base URI from the config file
    #[arg(long, global = true)]
    pub base_uri: Option<String>,

    /// Override the SDK key from the config file
    #[arg(long, global = true)]
    pub sdk_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the full flag and segment snapshot once
    All,
    /// Fetch a single feature flag
    Flag {
        /// Flag key
        key: String,
    },
    /// Fetch a single segment
    Segment {
        /// Segment key
        key: String,
    },
    /// Poll the full snapshot on a fixed interval
    Poll {
        /// Poll interval (e.g., "500ms", "1s", "30s"); overrides the config file
        #[arg(short, long)]
        interval: Option<String>,

        /// Stop after this many polls
        #[arg(short = 'n', long)]
        count: Option<u64>,
    },
}
