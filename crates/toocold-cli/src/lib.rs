//! Command-line dashboard for the Too Cold room-climate monitor.
//!
//! Shows an indoor temperature/humidity sensor next to the outdoor weather
//! and air quality for the same location, with a comfort score, window
//! statistics and an inside vs outside comparison.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `snapshot` | Refresh once and print the full dashboard |
//! | `watch` | Refresh on an interval until Ctrl+C |
//! | `compare` | Inside vs outside values at aligned instants |
//! | `stats` | Latest/min/max/avg over a window |
//! | `config` | Show, locate or initialize the configuration file |
//! | `accent` | Show or cycle the UI accent color |
//! | `completions` | Generate shell completions |
//!
//! Every data command takes `--range` (`1h`, `3h`, `6h`, `12h`, `24h`, `1w`)
//! and `--format` (`text` or `json`).
//!
//! # Configuration
//!
//! The CLI reads `~/.config/toocold/config.toml` (or platform equivalent):
//!
//! ```toml
//! accent = "blue"
//!
//! [dashboard]
//! indoor_url = "https://example.com/api/readings"
//! refresh_interval_secs = 60
//! location_name = "My Room"
//! timezone = "Asia/Kolkata"
//!
//! [dashboard.coords]
//! lat = 25.5941
//! lon = 85.1376
//! ```
//!
//! Without an `indoor_url` the dashboard runs in demo mode on a synthetic
//! series.
//!
//! # Environment Variables
//!
//! - `TOOCOLD_INDOOR_URL`: Indoor feed URL (overridden by `--indoor-url`)
//! - `TOOCOLD_CONFIG`: Configuration file path (overridden by `--config`)
//! - `NO_COLOR`: Disable colored output when set
//! - `RUST_LOG`: Log filter when neither `--verbose` nor `--quiet` is given
//!
//! # Examples
//!
//! ```bash
//! toocold snapshot --range 6h
//! toocold watch --interval 30 --format json
//! toocold accent next
//! ```

// The binary lives in main.rs; this crate root only documents it.

pub use toocold_core;
pub use toocold_types;
