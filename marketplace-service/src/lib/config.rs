use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        5
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    #[serde(default = "ServerConfig::default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    fn default_shutdown_timeout_secs() -> u64 {
        10
    }
}

/// Token signing configuration.
///
/// Read once at startup and handed to `auth::TokenManager`; nothing reads it
/// afterwards.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "JwtConfig::default_ttl_minutes")]
    pub ttl_minutes: i64,
}

impl JwtConfig {
    fn default_ttl_minutes() -> i64 {
        15
    }

    /// Lifetime of issued tokens.
    ///
    /// # Errors
    /// Fails unless `ttl_minutes` is positive and representable as a duration.
    pub fn ttl(&self) -> Result<chrono::Duration, ConfigError> {
        if self.ttl_minutes <= 0 {
            return Err(ConfigError::Message(format!(
                "jwt.ttl_minutes must be positive, got {}",
                self.ttl_minutes
            )));
        }

        chrono::Duration::try_minutes(self.ttl_minutes).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.ttl_minutes is out of range: {}",
                self.ttl_minutes
            ))
        })
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__TTL_MINUTES=60 overrides jwt.ttl_minutes
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.jwt.ttl()?;
        Ok(config)
    }
}
