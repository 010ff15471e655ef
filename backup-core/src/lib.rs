pub mod api;
pub mod api_config;
pub mod backup;
pub mod config;
pub mod constants;
pub mod date_codec;
pub mod error;
pub mod locator;
pub mod poll;
pub mod retention;
pub mod status;

pub use error::{BackupError, Result};
