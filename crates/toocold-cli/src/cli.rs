//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use toocold_core::config::{MAX_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL};
use toocold_types::TimeRange;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Reusable time window argument
#[derive(Debug, Clone, Copy, Args)]
pub struct RangeArgs {
    /// Time window: 1h, 3h, 6h, 12h, 24h or 1w
    #[arg(short, long, default_value = "24h")]
    pub range: TimeRange,
}

#[derive(Debug, Parser)]
#[command(name = "toocold")]
#[command(author, version, about = "Room-climate dashboard: indoor sensor vs outdoor weather", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (any non-empty `NO_COLOR` other than 0/false/no/off)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Use compact JSON output (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "TOOCOLD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Indoor feed URL, overriding the configuration file
    #[arg(long, global = true, env = "TOOCOLD_INDOOR_URL")]
    pub indoor_url: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Refresh once and print the full dashboard
    Snapshot {
        #[command(flatten)]
        range: RangeArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Refresh continuously and print the dashboard after every cycle
    Watch {
        #[command(flatten)]
        range: RangeArgs,

        /// Seconds between refreshes, 10 to 3600 (defaults to the configured interval)
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u64).range(MIN_REFRESH_INTERVAL..=MAX_REFRESH_INTERVAL)
        )]
        interval: Option<u64>,

        /// Number of refreshes before exiting (0 for unlimited)
        #[arg(short = 'n', long, default_value = "0")]
        count: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Compare indoor and outdoor values at aligned instants
    Compare {
        #[command(flatten)]
        range: RangeArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show latest/min/max/avg over a window
    Stats {
        #[command(flatten)]
        range: RangeArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show or change the UI accent color
    Accent {
        /// `next` to cycle, or one of blue, purple, green, orange, pink
        choice: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
