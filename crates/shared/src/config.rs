//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, in order of precedence (later wins):
    /// 1. `config/default.toml` (optional)
    /// 2. `config/{RUN_MODE}.toml` (optional)
    /// 3. `LEDGERLY__`-prefixed environment variables
    ///    (e.g. `LEDGERLY__DATABASE__URL`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_defaults() {
        let cfg: DatabaseConfig =
            serde_json::from_str(r#"{"url": "postgres://localhost/ledgerly"}"#).unwrap();
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.min_connections, 1);
    }
}
