//! Accent command implementation.

use std::path::Path;

use anyhow::Result;

use crate::config::{Accent, Config};

/// Print the current accent, or switch to `choice` (`next` cycles) and save it.
pub fn cmd_accent(choice: Option<&str>, path: &Path, no_color: bool) -> Result<()> {
    let mut config = Config::load_or_default(path);
    if let Some(choice) = choice {
        config.accent = apply_choice(config.accent, choice)?;
        config.save_to(path)?;
    }
    println!("Accent: {}", config.accent.paint(config.accent.as_str(), no_color));
    Ok(())
}

fn apply_choice(current: Accent, choice: &str) -> Result<Accent> {
    if choice.trim().eq_ignore_ascii_case("next") {
        Ok(current.next())
    } else {
        choice.parse()
    }
}
