pub mod completion;
pub mod config;
pub mod host;
pub mod info_file;
