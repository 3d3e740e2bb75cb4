use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::{DashboardConfig, DatabaseConfig, HooksConfig, SslMode, TransformConfig};

/// Deployment flavour. Development logs at `debug` by default.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

impl RunMode {
    pub fn default_log_filter(self) -> &'static str {
        match self {
            RunMode::Development => "debug",
            RunMode::Production => "info",
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub run_mode: RunMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Master key for signing flash cookies.
    pub secret_key: String,
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompanyConfig {
    /// Company used when a request carries no `X-Company-Id` header.
    pub default_id: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub app: GeneralConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub company: CompanyConfig,
    #[serde(default)]
    pub hooks: HooksConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("PROPERTY_EDITOR_CONFIG")
            .unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("app.run_mode", "development")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5002)?
            .set_default("server.secret_key", "dev-key-change-in-production")?
            .set_default("server.max_body_bytes", 50_i64 * 1024 * 1024)?
            .set_default("company.default_id", 1)?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., PROPERTY_EDITOR__DATABASE__PASSWORD)
            .add_source(Environment::with_prefix("PROPERTY_EDITOR").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
