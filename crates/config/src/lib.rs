//! Configuration management for fitbot
//!
//! Supports loading configuration from:
//! - TOML files (`config/default.toml`, then an environment-specific file)
//! - Environment variables (`FITBOT_` prefix, `__` separator)
//!
//! Every section carries full defaults, so the bot runs with no config
//! files at all (in-memory persistence, built-in message catalog).

pub mod messages;
pub mod settings;
pub mod tariffs;

pub use messages::Messages;
pub use settings::{load_settings, BotConfig, PersistenceConfig, RuntimeEnvironment, Settings};
pub use tariffs::{TariffTier, Tariffs};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
