use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;
mod util;

use cli::{Cli, Commands};
use commands::{WatchArgs, cmd_accent, cmd_compare, cmd_config, cmd_snapshot, cmd_stats, cmd_watch};
use config::Config;
use format::FormatOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "toocold", &mut io::stdout());
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so JSON on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(!cli.no_color)
        .init();

    let config_path = Config::resolve_path(cli.config.as_deref());
    let config = Config::load_or_default(&config_path);
    let dashboard = config.effective_dashboard(cli.indoor_url.as_deref());
    let opts = FormatOptions::new(cli.no_color, cli.compact, config.accent);
    let output = cli.output.as_ref();

    match cli.command {
        Commands::Snapshot { range, format } => {
            cmd_snapshot(dashboard, range.range, format, output, &opts).await?;
        }
        Commands::Watch {
            range,
            interval,
            count,
            format,
        } => {
            cmd_watch(WatchArgs {
                dashboard,
                range: range.range,
                interval,
                count,
                format,
                output,
                opts: &opts,
            })
            .await?;
        }
        Commands::Compare { range, format } => {
            cmd_compare(dashboard, range.range, format, output, &opts).await?;
        }
        Commands::Stats { range, format } => {
            cmd_stats(dashboard, range.range, format, output, &opts).await?;
        }
        Commands::Config { action } => {
            cmd_config(action, &config_path, cli.indoor_url.as_deref())?;
        }
        Commands::Accent { choice } => {
            cmd_accent(choice.as_deref(), &config_path, cli.no_color)?;
        }
        Commands::Completions { .. } => {
            // Already handled above
            unreachable!()
        }
    }

    Ok(())
}
