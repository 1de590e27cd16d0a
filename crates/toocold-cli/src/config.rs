//! Configuration file management.
//!
//! The file holds the dashboard settings under `[dashboard]` plus the UI
//! accent, which is the only value the CLI itself writes back.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use toocold_core::DashboardConfig;
use tracing::warn;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// UI accent color
    #[serde(default)]
    pub accent: Accent,

    /// Data sources and refresh cadence
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    /// `<config dir>/toocold/config.toml`, or `./toocold/config.toml` when the
    /// platform has no config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("toocold")
            .join("config.toml")
    }

    /// The explicit path if given, otherwise [`Config::default_path`].
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path)
    }

    /// Read `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Like [`Config::load_from`], but falls back to the defaults on error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = self.to_toml()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// The dashboard settings with command-line overrides applied.
    pub fn effective_dashboard(&self, indoor_url: Option<&str>) -> DashboardConfig {
        let mut dashboard = self.dashboard.clone();
        if let Some(url) = indoor_url {
            dashboard.indoor_url = url.to_string();
        }
        dashboard
    }
}

/// UI accent color, cycled with `toocold accent next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Blue,
    Purple,
    Green,
    Orange,
    Pink,
}

impl Accent {
    pub const ALL: [Accent; 5] = [
        Accent::Blue,
        Accent::Purple,
        Accent::Green,
        Accent::Orange,
        Accent::Pink,
    ];

    /// The following accent, wrapping around after pink.
    pub fn next(self) -> Self {
        match self {
            Accent::Blue => Accent::Purple,
            Accent::Purple => Accent::Green,
            Accent::Green => Accent::Orange,
            Accent::Orange => Accent::Pink,
            Accent::Pink => Accent::Blue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Accent::Blue => "blue",
            Accent::Purple => "purple",
            Accent::Green => "green",
            Accent::Orange => "orange",
            Accent::Pink => "pink",
        }
    }

    /// Render `text` in this accent, or unchanged when colors are off.
    pub fn paint(self, text: &str, no_color: bool) -> String {
        if no_color {
            return text.to_string();
        }
        match self {
            Accent::Blue => text.blue().bold().to_string(),
            Accent::Purple => text.magenta().bold().to_string(),
            Accent::Green => text.green().bold().to_string(),
            Accent::Orange => text.truecolor(255, 165, 0).bold().to_string(),
            Accent::Pink => text.bright_magenta().bold().to_string(),
        }
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Accent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        match Accent::ALL.into_iter().find(|a| a.as_str() == needle) {
            Some(accent) => Ok(accent),
            None => bail!(
                "Unknown accent '{}'. Valid values: blue, purple, green, orange, pink",
                s
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // --- Accent ---

    #[test]
    fn test_accent_cycles_through_all() {
        let mut accent = Accent::Blue;
        let mut seen = Vec::new();
        for _ in 0..Accent::ALL.len() {
            seen.push(accent);
            accent = accent.next();
        }
        assert_eq!(seen, Accent::ALL);
        assert_eq!(accent, Accent::Blue);
    }

    #[test]
    fn test_accent_from_str() {
        assert_eq!("Pink".parse::<Accent>().unwrap(), Accent::Pink);
        assert_eq!(" orange ".parse::<Accent>().unwrap(), Accent::Orange);
        assert!("teal".parse::<Accent>().is_err());
    }

    #[test]
    fn test_accent_paint_without_color() {
        assert_eq!(Accent::Green.paint("LIVE", true), "LIVE");
        assert_ne!(Accent::Green.paint("LIVE", false), "LIVE");
    }

    // --- File handling ---

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.dashboard.is_demo());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.accent = Accent::Orange;
        config.dashboard.indoor_url = "https://feed.example.com/readings".to_string();
        config.dashboard.location_name = "Study".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "accent = \"purple\"\n\n[dashboard]\nlocation_name = \"Attic\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.accent, Accent::Purple);
        assert_eq!(config.dashboard.location_name, "Attic");
        assert_eq!(config.dashboard.refresh_interval_secs, 60);
        assert!(config.dashboard.is_demo());
    }

    #[test]
    fn test_broken_file_is_an_error_but_load_or_default_recovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "accent = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn test_indoor_url_override() {
        let config = Config::default();
        let dashboard = config.effective_dashboard(Some("https://feed.example.com"));
        assert_eq!(dashboard.indoor_url, "https://feed.example.com");
        assert!(!dashboard.is_demo());
        assert!(config.effective_dashboard(None).is_demo());
    }

    #[test]
    fn test_resolve_path_prefers_explicit() {
        let explicit = PathBuf::from("/tmp/custom.toml");
        assert_eq!(Config::resolve_path(Some(&explicit)), explicit);
        assert!(Config::resolve_path(None).ends_with("toocold/config.toml"));
    }
}
