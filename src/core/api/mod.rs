pub mod client;

pub use client::{with_session, NpmClient, Session};

use crate::core::host::{HostFields, HostPatch, ProxyHost};
use crate::utils::Result;

/// Status and body of a write the server accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub status: u16,
    pub body: String,
}

/// Access to the remote proxy-host collection. Every method issues exactly one
/// request; a non-2xx reply becomes an error carrying the status and body.
pub trait ProxyHostApi {
    fn list_hosts(&self) -> Result<Vec<ProxyHost>>;

    fn create_host(&self, fields: &HostFields) -> Result<WriteOutcome>;

    fn update_host(&self, id: i64, patch: &HostPatch) -> Result<WriteOutcome>;

    fn remove_host(&self, id: i64) -> Result<WriteOutcome>;
}
