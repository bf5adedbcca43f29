use serde::{Deserialize, Serialize};

use crate::core::host::HostField;

pub mod defaults;
pub mod manager;

pub use manager::ConfigManager;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub templates: TemplateConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub default_port: u16,
    pub default_scheme: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TemplateConfig {
    pub create: String,
    pub update: String,
    pub search: String,
    pub search_fields: Vec<HostField>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct CredentialsConfig {
    pub info_file: Option<String>,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Json(error)
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.server.default_port == 0 {
            return Err(ConfigError::Validation(
                "server.default_port must be between 1 and 65535".to_string(),
            ));
        }

        if !matches!(self.server.default_scheme.as_str(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "server.default_scheme must be 'http' or 'https', got '{}'",
                self.server.default_scheme
            )));
        }

        for (key, name) in [
            ("templates.create", &self.templates.create),
            ("templates.update", &self.templates.update),
            ("templates.search", &self.templates.search),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
            }
        }

        if self.templates.update == self.templates.search {
            return Err(ConfigError::Validation(
                "templates.update and templates.search must name different hosts".to_string(),
            ));
        }

        if self.templates.search_fields.is_empty() {
            return Err(ConfigError::Validation(
                "templates.search_fields must list at least one field".to_string(),
            ));
        }

        Ok(())
    }

    pub fn default_info_file(&self) -> Option<&str> {
        self.credentials.info_file.as_deref()
    }
}
