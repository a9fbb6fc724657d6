//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: &Settings, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }

        ConfigAction::Init { force } => {
            if init_config(config_path, *force)? {
                Output::success(&format!("Wrote default configuration to {}", config_path.display()));
            } else {
                Output::warning(&format!(
                    "{} already exists. Use --force to overwrite it.",
                    config_path.display()
                ));
            }
        }
    }

    Ok(())
}

/// Write the default settings to `path`. Returns false if a file is
/// already there and `force` is not set.
fn init_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    Settings::default().save_to(path)?;
    Ok(true)
}
