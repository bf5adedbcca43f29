use super::{Config, CredentialsConfig, ServerConfig, TemplateConfig};
use crate::core::host::HostField;
use directories::ProjectDirs;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8181;
pub const CONFIG_ENV_VAR: &str = "NPMCTL_CONFIG";

pub fn default_config() -> Config {
    Config {
        server: default_server_config(),
        templates: default_template_config(),
        credentials: CredentialsConfig::default(),
    }
}

pub fn default_server_config() -> ServerConfig {
    ServerConfig {
        default_port: DEFAULT_PORT,
        default_scheme: "http".to_string(),
    }
}

pub fn default_template_config() -> TemplateConfig {
    TemplateConfig {
        create: "template".to_string(),
        update: "updatetemplate".to_string(),
        search: "searchtemplate".to_string(),
        search_fields: vec![HostField::AdvancedConfig],
    }
}

pub fn get_config_file_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(proj_dirs) = ProjectDirs::from("", "", "npmctl") {
        proj_dirs.config_dir().join("config.json")
    } else {
        PathBuf::from(".npmctl").join("config.json")
    }
}
