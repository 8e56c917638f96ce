//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: &Settings, path: Option<&PathBuf>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", settings.to_toml()?);
        }

        ConfigAction::Path => {
            let config_path = path.cloned().unwrap_or_else(Settings::default_config_path);
            println!("{}", config_path.display());
            if !config_path.exists() {
                Output::warning("File does not exist yet; defaults are in effect.");
            }
        }
    }

    Ok(())
}
