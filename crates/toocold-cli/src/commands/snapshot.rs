//! Snapshot command implementation.

use std::path::PathBuf;

use anyhow::Result;
use toocold_core::DashboardConfig;
use toocold_types::TimeRange;

use crate::cli::OutputFormat;
use crate::format::{DashboardHeader, FormatOptions, format_dashboard_json, format_dashboard_text};
use crate::util::{build_aggregator, refresh_view, write_output};

pub async fn cmd_snapshot(
    dashboard: DashboardConfig,
    range: TimeRange,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let location = dashboard.location_name.clone();
    let aggregator = build_aggregator(dashboard)?;
    let (snapshot, view) = refresh_view(&aggregator, range).await?;

    let header = DashboardHeader {
        location: &location,
        connectivity: aggregator.state().connectivity,
        offset: snapshot.display_offset(),
    };
    let content = match format {
        OutputFormat::Json => format_dashboard_json(&view, &header, opts)?,
        OutputFormat::Text => format_dashboard_text(&view, &header, opts),
    };
    write_output(output, &content)
}
