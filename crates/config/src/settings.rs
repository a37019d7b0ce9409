//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::messages::Messages;
use crate::tariffs::Tariffs;
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation
    #[default]
    Development,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,

    /// Persistence configuration (ScyllaDB)
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// User-facing message catalog
    #[serde(default)]
    pub messages: Messages,

    /// Tariff tier catalog
    #[serde(default)]
    pub tariffs: Tariffs,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.is_production() && self.bot.token.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "bot.token".into(),
                message: "bot token is required in production".into(),
            });
        }
        if self.tariffs.tiers.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tariffs.tiers".into(),
                message: "at least one tariff tier must be defined".into(),
            });
        }
        Ok(())
    }
}

/// Chat bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Platform bot token (empty in development / console mode)
    #[serde(default)]
    pub token: String,

    /// Seconds before temp messages are auto-expired by the transport
    #[serde(default = "default_temp_ttl_secs")]
    pub temp_message_ttl_secs: u64,
}

fn default_temp_ttl_secs() -> u64 {
    30
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            temp_message_ttl_secs: default_temp_ttl_secs(),
        }
    }
}

/// Persistence configuration for ScyllaDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enable ScyllaDB persistence (false = in-memory only)
    #[serde(default)]
    pub enabled: bool,

    /// ScyllaDB host addresses
    #[serde(default = "default_scylla_hosts")]
    pub scylla_hosts: Vec<String>,

    /// ScyllaDB keyspace name
    #[serde(default = "default_scylla_keyspace")]
    pub keyspace: String,

    /// ScyllaDB replication factor
    #[serde(default = "default_replication_factor")]
    pub replication_factor: u8,
}

fn default_scylla_hosts() -> Vec<String> {
    std::env::var("SCYLLA_HOSTS")
        .map(|s| s.split(',').map(|h| h.trim().to_string()).collect())
        .unwrap_or_else(|_| vec!["127.0.0.1:9042".to_string()])
}

fn default_scylla_keyspace() -> String {
    std::env::var("SCYLLA_KEYSPACE").unwrap_or_else(|_| "fitbot".to_string())
}

fn default_replication_factor() -> u8 {
    1
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scylla_hosts: default_scylla_hosts(),
            keyspace: default_scylla_keyspace(),
            replication_factor: default_replication_factor(),
        }
    }
}

/// Load settings from config files and environment variables
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("FITBOT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        persistence = settings.persistence.enabled,
        "Settings loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.persistence.enabled);
        assert_eq!(settings.bot.temp_message_ttl_secs, 30);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_production_requires_token() {
        let settings = Settings {
            environment: RuntimeEnvironment::Production,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_tiers_rejected() {
        let mut settings = Settings::default();
        settings.tariffs.tiers.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            environment = "production"

            [bot]
            token = "123:abc"

            [[tariffs.tiers]]
            name = "Solo"
            description = "One tier only"
            "#,
        )
        .unwrap();

        assert!(settings.environment.is_production());
        assert_eq!(settings.bot.temp_message_ttl_secs, 30);
        assert_eq!(settings.tariffs.names(), vec!["Solo"]);
        assert!(!settings.messages.terms.is_empty());
        assert!(settings.validate().is_ok());
    }
}
