//! Compare command implementation.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use toocold_core::{Comparison, DashboardConfig};
use toocold_types::TimeRange;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_comparison_text};
use crate::util::{build_aggregator, refresh_view, write_output};

pub async fn cmd_compare(
    dashboard: DashboardConfig,
    range: TimeRange,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let aggregator = build_aggregator(dashboard)?;
    let (_, view) = refresh_view(&aggregator, range).await?;

    let content = match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct CompareOutput<'a> {
                range: TimeRange,
                #[serde(flatten)]
                comparison: &'a Comparison,
            }
            opts.as_json(&CompareOutput {
                range,
                comparison: &view.comparison,
            })?
        }
        OutputFormat::Text => format_comparison_text(&view.comparison, range, opts),
    };
    write_output(output, &content)
}
