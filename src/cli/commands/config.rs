use crate::cli::parser::{ConfigArgs, ConfigCommands, GlobalArgs};
use crate::config::defaults::get_config_file_path;
use crate::config::ConfigManager;
use crate::utils::{NpmError, Result};
use std::path::PathBuf;

pub fn execute(global: &GlobalArgs, args: ConfigArgs) -> Result<()> {
    let path = global.config.clone().unwrap_or_else(get_config_file_path);

    match args.command {
        Some(ConfigCommands::Show) | None => execute_show(path),
        Some(ConfigCommands::Path) => {
            println!("{}", path.display());
            Ok(())
        }
        Some(ConfigCommands::Reset) => execute_reset(path),
    }
}

fn execute_show(path: PathBuf) -> Result<()> {
    let config = ConfigManager::load_or_create_with_path(Some(&path))
        .map_err(|e| NpmError::config_error(format!("Failed to load configuration: {e}")))?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn execute_reset(path: PathBuf) -> Result<()> {
    ConfigManager::reset(&path)
        .map_err(|e| NpmError::config_error(format!("Failed to reset configuration: {e}")))?;
    println!("Configuration reset to defaults at {}", path.display());
    Ok(())
}
