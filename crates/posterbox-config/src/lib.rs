//! Posterbox Config - Configuration management for Posterbox.

mod config;
mod credentials;
mod error;
mod paths;

pub use config::*;
pub use credentials::{MailCredentials, ACCOUNT_VAR, PASSWORD_VAR, SERVER_VAR};
pub use error::{ConfigError, ConfigResult};
pub use paths::AppPaths;
