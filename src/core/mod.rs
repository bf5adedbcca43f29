pub mod api;
pub mod credentials;
pub mod host;
pub mod workflow;
