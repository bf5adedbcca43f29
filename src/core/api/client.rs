use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ProxyHostApi, WriteOutcome};
use crate::config::ServerConfig;
use crate::core::credentials::Credentials;
use crate::core::host::{HostFields, HostPatch, ProxyHost};
use crate::utils::{NpmError, Result};

const TOKEN_ENDPOINT: &str = "/api/tokens";
const HOSTS_ENDPOINT: &str = "/api/nginx/proxy-hosts";

#[derive(Serialize)]
struct TokenRequest<'a> {
    identity: &'a str,
    secret: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// Unauthenticated transport for one NPM server.
pub struct NpmClient {
    base_url: String,
    client: Client,
}

impl NpmClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("npmctl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange identity and secret for a bearer token.
    pub fn authenticate(self, identity: &str, secret: &str) -> Result<Session> {
        debug!(url = %self.url(TOKEN_ENDPOINT), "requesting token");

        let response = self
            .client
            .post(self.url(TOKEN_ENDPOINT))
            .json(&TokenRequest { identity, secret })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text()?;
            debug!(status = status.as_u16(), "token request rejected");
            return Err(NpmError::auth(body));
        }

        let TokenResponse { token } = response.json()?;
        debug!("session opened");

        Ok(Session {
            client: self,
            token: Some(token),
        })
    }
}

/// An authenticated session. The token is released by `close` or, failing
/// that, when the session is dropped.
pub struct Session {
    client: NpmClient,
    token: Option<String>,
}

impl Session {
    pub fn close(mut self) {
        self.release();
    }

    pub fn is_open(&self) -> bool {
        self.token.is_some()
    }

    fn release(&mut self) {
        if self.token.take().is_some() {
            debug!(url = %self.client.base_url, "session closed");
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn send_write(&self, action: &str, builder: RequestBuilder) -> Result<WriteOutcome> {
        let response = self.authorized(builder).send()?;
        let outcome = check_write(action, response)?;
        info!(action, status = outcome.status, "host write accepted");
        Ok(outcome)
    }

    fn host_url(&self, id: i64) -> String {
        self.client.url(&format!("{}/{}", HOSTS_ENDPOINT, id))
    }
}

fn check_write(action: &str, response: Response) -> Result<WriteOutcome> {
    let status = response.status().as_u16();
    let body = response.text()?;
    debug!(action, status, "write response");

    if (200..300).contains(&status) {
        Ok(WriteOutcome { status, body })
    } else {
        Err(NpmError::write(action, status, body))
    }
}

impl ProxyHostApi for Session {
    fn list_hosts(&self) -> Result<Vec<ProxyHost>> {
        let builder = self.client.client.get(self.client.url(HOSTS_ENDPOINT));
        let response = self.authorized(builder).send()?;

        let status = response.status();
        debug!(status = status.as_u16(), "GET {}", HOSTS_ENDPOINT);
        if !status.is_success() {
            return Err(NpmError::fetch(status.as_u16(), response.text()?));
        }

        let hosts: Vec<ProxyHost> = response.json()?;
        debug!(count = hosts.len(), "fetched proxy hosts");
        Ok(hosts)
    }

    fn create_host(&self, fields: &HostFields) -> Result<WriteOutcome> {
        let builder = self.client.client.post(self.client.url(HOSTS_ENDPOINT));
        self.send_write("create", builder.json(fields))
    }

    fn update_host(&self, id: i64, patch: &HostPatch) -> Result<WriteOutcome> {
        let builder = self.client.client.put(self.host_url(id));
        self.send_write("update", builder.json(patch))
    }

    fn remove_host(&self, id: i64) -> Result<WriteOutcome> {
        let builder = self.client.client.delete(self.host_url(id));
        self.send_write("remove", builder)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

/// Open a session for `credentials`, run `f`, and close the session on every
/// exit path.
pub fn with_session<T, F>(credentials: &Credentials, server: &ServerConfig, f: F) -> Result<T>
where
    F: FnOnce(&Session) -> Result<T>,
{
    let client = NpmClient::new(&credentials.base_url(server))?;
    let session = client.authenticate(&credentials.username, &credentials.password)?;
    let result = f(&session);
    session.close();
    result
}
