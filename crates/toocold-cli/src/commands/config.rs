//! Config command implementation.

use std::path::Path;

use anyhow::{Result, bail};
use tracing::warn;

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn cmd_config(action: ConfigAction, path: &Path, indoor_url: Option<&str>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let mut config = Config::load_from(path)?;
            config.dashboard = config.effective_dashboard(indoor_url);
            if let Err(e) = config.dashboard.validate() {
                warn!("{}", e);
            }
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save_to(path)?;
            eprintln!("Created config file: {}", path.display());
        }
    }
    Ok(())
}
