//! Stats command implementation.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use toocold_core::{DashboardConfig, StatsSummary};
use toocold_types::TimeRange;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_stats_text};
use crate::util::{build_aggregator, refresh_view, write_output};

pub async fn cmd_stats(
    dashboard: DashboardConfig,
    range: TimeRange,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let aggregator = build_aggregator(dashboard)?;
    let (snapshot, view) = refresh_view(&aggregator, range).await?;

    let content = match format {
        OutputFormat::Json => {
            // `stats` is null when the window holds no readings.
            #[derive(Serialize)]
            struct StatsOutput<'a> {
                range: TimeRange,
                stats: Option<&'a StatsSummary>,
            }
            opts.as_json(&StatsOutput {
                range,
                stats: view.stats.as_ref(),
            })?
        }
        OutputFormat::Text => {
            format_stats_text(view.stats.as_ref(), range, snapshot.display_offset(), opts)
        }
    };
    write_output(output, &content)
}
