pub mod error;
pub mod logging;

pub use error::{NpmError, Result};
pub use logging::init_logging;
