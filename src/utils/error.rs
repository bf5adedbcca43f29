use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NpmError {
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Failed to fetch hosts:\nStatus {status}\n\n{body}")]
    Fetch { status: u16, body: String },

    #[error("Failed to {action} host:\nStatus {status}\n\n{body}")]
    Write {
        action: String,
        status: u16,
        body: String,
    },

    #[error("Could not find a template for the domain '{domain}'")]
    TemplateNotFound { domain: String },

    #[error("Failed to find domain '{domain}'")]
    DomainNotFound { domain: String },

    #[error("The following domains already have an entry on this server: {}", .domains.join(", "))]
    Conflict { domains: Vec<String> },

    #[error("Invalid arguments: {message}")]
    InvalidArgs { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid info file: {message}")]
    Credentials { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, NpmError>;

impl NpmError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn fetch(status: u16, body: impl Into<String>) -> Self {
        Self::Fetch {
            status,
            body: body.into(),
        }
    }

    pub fn write(action: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Write {
            action: action.into(),
            status,
            body: body.into(),
        }
    }

    pub fn template_not_found(domain: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            domain: domain.into(),
        }
    }

    pub fn domain_not_found(domain: impl Into<String>) -> Self {
        Self::DomainNotFound {
            domain: domain.into(),
        }
    }

    pub fn conflict(domains: Vec<String>) -> Self {
        Self::Conflict { domains }
    }

    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound { .. } | Self::DomainNotFound { .. }
        )
    }
}

impl From<PathBuf> for NpmError {
    fn from(path: PathBuf) -> Self {
        Self::FileNotFound {
            path: path.to_string_lossy().to_string(),
        }
    }
}
