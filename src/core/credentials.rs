use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::config::ServerConfig;
use crate::utils::{NpmError, Result};

/// Login details for one NPM server. Held for a single run only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub host: String,
    pub username: String,
    pub password: String,
    pub port: Option<u16>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"********")
            .field("port", &self.port)
            .finish()
    }
}

impl Credentials {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        port: Option<u16>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            port,
        }
    }

    /// Resolve the API root. A host that already names its scheme is kept as
    /// given; a bare host gets the configured scheme and port.
    pub fn base_url(&self, server: &ServerConfig) -> String {
        let host = self.host.trim().trim_end_matches('/');

        if let Some((scheme, rest)) = host.split_once("://") {
            let (authority, path) = match rest.find('/') {
                Some(index) => rest.split_at(index),
                None => (rest, ""),
            };
            return match self.port {
                Some(port) if !authority_has_port(authority) => {
                    format!("{}://{}:{}{}", scheme, authority, port, path)
                }
                _ => host.to_string(),
            };
        }

        format!(
            "{}://{}:{}",
            server.default_scheme,
            host,
            self.port.unwrap_or(server.default_port)
        )
    }
}

fn authority_has_port(authority: &str) -> bool {
    match authority.rsplit_once(':') {
        // IPv6 literals carry colons inside brackets
        Some((_, port)) => !port.contains(']') && port.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

fn encode_line(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

fn decode_line(line: Option<&str>, name: &str) -> Result<String> {
    let line = line
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| NpmError::credentials(format!("missing {} line", name)))?;
    let bytes = STANDARD.decode(line)?;
    Ok(String::from_utf8(bytes)?)
}

/// Write `credentials` as one base64 line per value. The port line is only
/// written when a port is set.
pub fn write_info_file(path: &Path, credentials: &Credentials) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut contents = format!(
        "{}\n{}\n{}\n",
        encode_line(&credentials.host),
        encode_line(&credentials.username),
        encode_line(&credentials.password)
    );
    if let Some(port) = credentials.port {
        contents.push_str(&encode_line(&port.to_string()));
        contents.push('\n');
    }

    let mut file = fs::File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    tracing::debug!(path = %path.display(), "wrote info file");
    Ok(())
}

pub fn read_info_file(path: &Path) -> Result<Credentials> {
    if !path.exists() {
        return Err(path.to_path_buf().into());
    }

    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines();

    let host = decode_line(lines.next(), "host")?;
    let username = decode_line(lines.next(), "username")?;
    let password = decode_line(lines.next(), "password")?;

    let port = match lines.next().map(str::trim).filter(|l| !l.is_empty()) {
        Some(line) => {
            let raw = decode_line(Some(line), "port")?;
            let port = raw
                .parse::<u16>()
                .map_err(|_| NpmError::credentials(format!("invalid port '{}'", raw)))?;
            Some(port)
        }
        None => None,
    };

    Ok(Credentials {
        host,
        username,
        password,
        port,
    })
}
