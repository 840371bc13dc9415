pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "gramfeed")]
#[command(about = "Build RSS feeds from profile pages", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/gramfeed/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the feed for a profile
    Feed {
        /// Profile name as it appears in the profile URL
        profile_id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Rss)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Show the effective configuration
    Config {
        /// Only print the config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Rss,
    Json,
}
