pub mod cli;
pub mod config;
pub mod core;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::config::Config;
pub use crate::core::api::{with_session, NpmClient, ProxyHostApi, Session, WriteOutcome};
pub use crate::core::credentials::Credentials;
pub use crate::core::host::{HostField, HostFields, ProxyHost, Template};
pub use crate::utils::{NpmError, Result};
