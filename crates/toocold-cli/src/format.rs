//! Output formatting for text and JSON.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};
use toocold_core::{
    ComfortLabel, Comparison, Connectivity, DashboardView, MetricStats, SensorHealth,
    SourceStatus, StatsSummary,
};
use toocold_types::TimeRange;

use crate::config::Accent;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Accent for headings.
    pub accent: Accent,
}

impl FormatOptions {
    pub fn new(no_color: bool, compact: bool, accent: Accent) -> Self {
        Self {
            no_color,
            compact,
            accent,
        }
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }

    fn heading(&self, text: &str) -> String {
        self.accent.paint(text, self.no_color)
    }

    fn dim(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.dimmed().to_string()
        }
    }
}

// ============================================================================
// Labels
// ============================================================================

#[must_use]
pub fn format_connectivity(connectivity: Connectivity, no_color: bool) -> String {
    let label = connectivity.to_string();
    if no_color {
        return format!("[{}]", label);
    }
    match connectivity {
        Connectivity::Live => format!("[{}]", label.green()),
        Connectivity::Offline => format!("[{}]", label.red()),
        Connectivity::Pending => format!("[{}]", label.dimmed()),
    }
}

#[must_use]
pub fn format_source_status(status: SourceStatus, no_color: bool) -> String {
    let label = status.to_string();
    if no_color {
        return label;
    }
    match status {
        SourceStatus::Ok => label.green().to_string(),
        SourceStatus::Demo => label.cyan().to_string(),
        SourceStatus::Error => label.red().to_string(),
    }
}

#[must_use]
pub fn format_health(health: SensorHealth, no_color: bool) -> String {
    let label = health.to_string();
    if no_color {
        return label;
    }
    match health {
        SensorHealth::Online => label.green().to_string(),
        SensorHealth::Delayed => label.yellow().to_string(),
        SensorHealth::Offline => label.red().to_string(),
        SensorHealth::Demo => label.cyan().to_string(),
    }
}

#[must_use]
pub fn format_comfort_label(label: ComfortLabel, no_color: bool) -> String {
    let text = label.to_string();
    if no_color {
        return text;
    }
    match label {
        ComfortLabel::Excellent => text.green().bold().to_string(),
        ComfortLabel::Good => text.green().to_string(),
        ComfortLabel::Moderate => text.yellow().to_string(),
        ComfortLabel::Poor => text.red().to_string(),
    }
}

/// `+7.0°C`, `-3.5%`.
#[must_use]
pub fn format_diff(value: f64, unit: &str) -> String {
    format!("{:+.1}{}", value, unit)
}

/// `HH:MM` at `offset`.
#[must_use]
pub fn format_clock(at: OffsetDateTime, offset: UtcOffset) -> String {
    let local = at.to_offset(offset);
    format!("{:02}:{:02}", local.hour(), local.minute())
}

fn format_stamp(at: OffsetDateTime, offset: UtcOffset) -> String {
    let local = at.to_offset(offset);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        local.year(),
        u8::from(local.month()),
        local.day(),
        local.hour(),
        local.minute()
    )
}

/// One block character per value, scaled between the series min and max.
#[must_use]
pub fn sparkline(values: &[f64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    values
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                ' '
            } else if max - min < f64::EPSILON {
                BARS[3]
            } else {
                let idx = ((v - min) / (max - min) * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            }
        })
        .collect()
}

// ============================================================================
// Dashboard
// ============================================================================

/// Everything above the view itself.
#[derive(Debug, Clone, Copy)]
pub struct DashboardHeader<'a> {
    pub location: &'a str,
    pub connectivity: Connectivity,
    pub offset: UtcOffset,
}

pub fn format_dashboard_json(
    view: &DashboardView,
    header: &DashboardHeader<'_>,
    opts: &FormatOptions,
) -> Result<String> {
    #[derive(Serialize)]
    struct DashboardOutput<'a> {
        location: &'a str,
        connectivity: Connectivity,
        #[serde(flatten)]
        view: &'a DashboardView,
    }

    opts.as_json(&DashboardOutput {
        location: header.location,
        connectivity: header.connectivity,
        view,
    })
}

#[must_use]
pub fn format_dashboard_text(
    view: &DashboardView,
    header: &DashboardHeader<'_>,
    opts: &FormatOptions,
) -> String {
    let nc = opts.no_color;
    let mut out = String::new();

    out.push_str(&format!(
        "{}  {}  {}\n",
        opts.heading(header.location),
        format_connectivity(header.connectivity, nc),
        opts.dim(&format!(
            "range {} | updated {}",
            view.range,
            format_stamp(view.fetched_at, header.offset)
        ))
    ));
    out.push_str(&"-".repeat(50));
    out.push('\n');

    let hero = &view.hero;
    out.push_str(&format!(
        "{:<12}{:.1}°C  {:.0}%\n",
        "Indoor", hero.indoor_temp, hero.indoor_hum
    ));
    match (hero.outdoor_temp, hero.outdoor_hum) {
        (Some(temp), Some(hum)) => {
            let mut line = format!("{:<12}{:.1}°C  {:.0}%", "Outdoor", temp, hum);
            if let (Some(dt), Some(dh)) = (hero.temp_diff, hero.hum_diff) {
                line.push_str(&opts.dim(&format!(
                    "  (inside {} / {})",
                    format_diff(dt, "°C"),
                    format_diff(dh, "%")
                )));
            }
            out.push_str(&line);
            out.push('\n');
        }
        _ => out.push_str(&format!("{:<12}{}\n", "Outdoor", opts.dim("--"))),
    }

    let comfort = &view.comfort;
    out.push_str(&format!(
        "{:<12}{} {}  {}\n",
        "Comfort",
        comfort.score,
        format_comfort_label(comfort.label, nc),
        opts.dim(&format!(
            "(temp {:.0}, humidity {:.0}, air {:.0})",
            comfort.temp_score, comfort.hum_score, comfort.aqi_score
        ))
    ));

    let dew = view
        .derived
        .dew_point
        .map(|d| format!("{:.1}°C", d))
        .unwrap_or_else(|| "--".to_string());
    out.push_str(&format!(
        "{:<12}{}  feels like {:.1}°C\n",
        "Dew point", dew, view.derived.feels_like
    ));

    out.push_str(&format!(
        "{:<12}{}  power {}  last {}\n",
        "Sensor",
        format_health(view.sensor.health, nc),
        view.sensor.power,
        format_clock(view.sensor.last_reading, header.offset)
    ));

    let outdoor = &view.outdoor;
    let optional = |v: Option<String>| v.unwrap_or_else(|| "--".to_string());
    out.push_str(&format!(
        "{:<12}{}  UV {}  wind {}  AQI {}\n",
        "Weather",
        optional(outdoor.condition.clone()),
        optional(outdoor.uv_index.map(|u| format!("{:.1}", u))),
        optional(outdoor.wind_speed.map(|w| format!("{} km/h", w))),
        optional(outdoor.aqi.map(|a| a.to_string()))
    ));

    out.push_str(&format!(
        "{:<12}indoor {} | weather {} | air quality {}  {}\n",
        "Sources",
        format_source_status(view.statuses.indoor, nc),
        format_source_status(view.statuses.weather, nc),
        format_source_status(view.statuses.air_quality, nc),
        opts.dim(&format!("({} calls)", view.source_call_count))
    ));

    if !view.trend.temp.is_empty() {
        out.push_str(&format!(
            "{:<12}{}  {}\n",
            "Trend",
            sparkline(&view.trend.temp),
            opts.dim(&format!(
                "{} .. {}",
                view.trend.labels.first().map(String::as_str).unwrap_or(""),
                view.trend.labels.last().map(String::as_str).unwrap_or("")
            ))
        ));
    }

    out.push('\n');
    out.push_str(&format_stats_text(
        view.stats.as_ref(),
        view.range,
        header.offset,
        opts,
    ));
    out.push('\n');
    out.push_str(&format_comparison_text(&view.comparison, view.range, opts));
    out
}

// ============================================================================
// Stats
// ============================================================================

#[must_use]
pub fn format_stats_text(
    stats: Option<&StatsSummary>,
    range: TimeRange,
    offset: UtcOffset,
    opts: &FormatOptions,
) -> String {
    let Some(stats) = stats else {
        return format!(
            "{}\nNo readings in the selected range.\n",
            opts.heading(&format!("Stats ({})", range))
        );
    };

    let mut out = format!(
        "{}\n",
        opts.heading(&format!("Stats ({}, {} readings)", range, stats.count))
    );
    out.push_str(&opts.dim(&format!(
        "{:<10}{:<16}{:<16}{:<16}{}",
        "", "Latest", "Min", "Max", "Avg"
    )));
    out.push('\n');
    out.push_str(&stats_row("Temp °C", &stats.temp, offset));
    out.push_str(&stats_row("Hum %", &stats.hum, offset));
    out
}

fn stats_row(name: &str, stats: &MetricStats, offset: UtcOffset) -> String {
    let cell = |value: f64, at: OffsetDateTime| {
        format!("{:.1} @{}", value, format_clock(at, offset))
    };
    format!(
        "{:<10}{:<16}{:<16}{:<16}{:.1}\n",
        name,
        cell(stats.latest.value, stats.latest.timestamp),
        cell(stats.min.value, stats.min.timestamp),
        cell(stats.max.value, stats.max.timestamp),
        stats.avg
    )
}

// ============================================================================
// Comparison
// ============================================================================

#[must_use]
pub fn format_comparison_text(
    comparison: &Comparison,
    range: TimeRange,
    opts: &FormatOptions,
) -> String {
    let mut out = format!(
        "{}\n",
        opts.heading(&format!("Inside vs outside ({})", range))
    );
    out.push_str(&opts.dim(&format!(
        "{:<8}{:>8}{:>8}{:>8}{:>8}",
        "Time", "In °C", "Out °C", "In %", "Out %"
    )));
    out.push('\n');
    for i in 0..comparison.len() {
        out.push_str(&format!(
            "{:<8}{:>8.1}{:>8.1}{:>8.0}{:>8.0}\n",
            comparison.labels[i],
            comparison.in_temp[i],
            comparison.out_temp[i],
            comparison.in_hum[i],
            comparison.out_hum[i]
        ));
    }
    out
}
