//! Watch command implementation.
//!
//! Refreshes on a fixed interval and prints the dashboard after every cycle.
//! A failed refresh keeps showing the last good snapshot, marked OFFLINE.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::time::{Instant, MissedTickBehavior};
use toocold_core::DashboardConfig;
use toocold_types::TimeRange;
use tracing::{debug, warn};

use crate::cli::OutputFormat;
use crate::format::{
    DashboardHeader, FormatOptions, format_connectivity, format_dashboard_json,
    format_dashboard_text,
};
use crate::util::{build_aggregator, view_of, write_output};

/// Arguments for the watch command.
pub struct WatchArgs<'a> {
    pub dashboard: DashboardConfig,
    pub range: TimeRange,
    /// Overrides the configured refresh interval.
    pub interval: Option<u64>,
    /// Stop after this many refreshes; 0 runs until Ctrl+C.
    pub count: u32,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_watch(args: WatchArgs<'_>) -> Result<()> {
    let WatchArgs {
        mut dashboard,
        range,
        interval,
        count,
        format,
        output,
        opts,
    } = args;

    // The override goes through the same validation as the configured value.
    if let Some(secs) = interval {
        dashboard.refresh_interval_secs = secs;
    }
    let period = dashboard.refresh_interval();
    let location = dashboard.location_name.clone();
    let aggregator = build_aggregator(dashboard)?;

    let title = if opts.no_color {
        format!("Watching: {}", location)
    } else {
        format!("Watching: {}", location.green())
    };
    eprintln!("{}", title);
    if count > 0 {
        eprintln!(
            "Interval: {}s | Count: {} | Press Ctrl+C to stop",
            period.as_secs(),
            count
        );
    } else {
        eprintln!("Interval: {}s | Press Ctrl+C to stop", period.as_secs());
    }
    eprintln!("{}", "-".repeat(50));

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut countdown = tokio::time::interval(Duration::from_secs(1));
    let mut next_refresh = Instant::now();
    let mut refreshes: u32 = 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                return Ok(());
            }
            _ = ticker.tick() => {
                if let Err(e) = aggregator.refresh().await {
                    warn!("Keeping previous data: {}", e);
                }
                refreshes += 1;
                next_refresh = Instant::now() + period;

                let state = aggregator.state();
                match state.snapshot {
                    Some(snapshot) => {
                        let view = view_of(&snapshot, range)?;
                        let header = DashboardHeader {
                            location: &location,
                            connectivity: state.connectivity,
                            offset: snapshot.display_offset(),
                        };
                        let content = match format {
                            OutputFormat::Json => format_dashboard_json(&view, &header, opts)?,
                            OutputFormat::Text => format_dashboard_text(&view, &header, opts) + "\n",
                        };
                        write_output(output, &content)?;
                    }
                    None => eprintln!(
                        "{} No data yet: {}",
                        format_connectivity(state.connectivity, opts.no_color),
                        state.last_error.as_deref().unwrap_or("waiting for first refresh")
                    ),
                }

                if count > 0 && refreshes >= count {
                    eprintln!("Completed {} refreshes.", refreshes);
                    return Ok(());
                }
            }
            _ = countdown.tick() => {
                let remaining = next_refresh.saturating_duration_since(Instant::now());
                debug!("Next refresh in {}s", remaining.as_secs());
            }
        }
    }
}
