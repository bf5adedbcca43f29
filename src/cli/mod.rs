pub mod commands;
pub mod parser;


pub use parser::{Cli, Commands};

use crate::config::{Config, ConfigManager};
use crate::utils::{NpmError, Result};

pub fn execute_command(cli: Cli) -> Result<()> {
    execute_command_with_config(cli, None)
}

pub fn execute_command_with_config(cli: Cli, test_config: Option<Config>) -> Result<()> {
    let Cli { global, command } = cli;

    let load_config = || -> Result<Config> {
        match test_config {
            Some(cfg) => Ok(cfg),
            None => ConfigManager::load_or_create_with_path(global.config.as_deref())
                .map_err(|e| NpmError::config_error(format!("Failed to load config: {}", e))),
        }
    };

    match command {
        Commands::CreateInfoFile(args) => commands::info_file::execute(&global, args),
        Commands::Host(args) => commands::host::execute(load_config()?, &global, args),
        Commands::Config(args) => commands::config::execute(&global, args),
        Commands::Completion(args) => commands::completion::execute(args),
    }
}
