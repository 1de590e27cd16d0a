//! Helpers shared by the dashboard commands.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use toocold_core::{Aggregator, DashboardConfig, DashboardView, ReqwestTransport, Snapshot};
use toocold_types::TimeRange;
use tracing::debug;

/// Validate `dashboard` and build an aggregator over a real HTTP client.
pub fn build_aggregator(dashboard: DashboardConfig) -> Result<Aggregator<ReqwestTransport>> {
    dashboard.validate()?;
    let transport = ReqwestTransport::new(dashboard.request_timeout())
        .context("Failed to build HTTP client")?;
    if dashboard.is_demo() {
        debug!("No indoor feed configured, serving demo data");
    }
    Ok(Aggregator::new(transport, dashboard))
}

/// Run one refresh and build the view for `range` as of the refresh time.
pub async fn refresh_view(
    aggregator: &Aggregator<ReqwestTransport>,
    range: TimeRange,
) -> Result<(Arc<Snapshot>, DashboardView)> {
    let snapshot = aggregator.refresh().await?;
    let view = view_of(&snapshot, range)?;
    Ok((snapshot, view))
}

pub fn view_of(snapshot: &Snapshot, range: TimeRange) -> Result<DashboardView> {
    let view = DashboardView::build(
        snapshot,
        range,
        snapshot.fetched_at,
        snapshot.display_offset(),
    )?;
    Ok(view)
}

pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
