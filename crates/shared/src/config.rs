//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Media storage provider credentials.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Deployment environment label reported by the health endpoint.
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    "development".to_string()
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

/// Media storage provider credentials.
///
/// All three values must be present and non-empty for the gateway to be
/// considered configured. Missing values are a normal, representable
/// state: the server still starts and the upload endpoint reports
/// service-unavailable instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    /// Provider cloud name (tenant identifier).
    #[serde(default)]
    pub cloud_name: Option<String>,
    /// Provider API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Provider API secret. Never exposed through the API.
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("COURIER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
