use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// TLS negotiation mode passed to PostgreSQL as `sslmode`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    Disable,
    Prefer,
    #[default]
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

/// Connection settings for the staging database.
///
/// The credential is only ever read from the config file or environment
/// (`PROPERTY_EDITOR__DATABASE__PASSWORD`) and is redacted from `Debug` output.
#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL. When set, the individual fields below are ignored.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_name")]
    pub database: String,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub ssl_mode: SslMode,
    /// Schema search path holding the staging table. Ignored for non-Postgres URLs.
    #[serde(default = "default_db_schema")]
    pub schema: Option<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Create the staging table at startup when it is missing. Local development only.
    #[serde(default)]
    pub ensure_table: bool,
}

fn default_db_host() -> String {
    "localhost".into()
}
fn default_db_port() -> u16 {
    5432
}
fn default_db_name() -> String {
    "hkh_decision_support_db".into()
}
fn default_db_user() -> String {
    "postgres".into()
}
fn default_db_schema() -> Option<String> {
    Some("hkh_dev".into())
}
fn default_connect_timeout_secs() -> u64 {
    8
}

impl DatabaseConfig {
    /// Settings pointing at an explicit URL, with no schema search path.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            schema: None,
            ..Default::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_db_host(),
            port: default_db_port(),
            database: default_db_name(),
            user: default_db_user(),
            password: None,
            ssl_mode: SslMode::default(),
            schema: default_db_schema(),
            connect_timeout_secs: default_connect_timeout_secs(),
            ensure_table: false,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("ssl_mode", &self.ssl_mode)
            .field("schema", &self.schema)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("ensure_table", &self.ensure_table)
            .finish()
    }
}

/// Settings for the `dbt run` transformation refresh.
#[derive(Debug, Deserialize, Clone)]
pub struct TransformConfig {
    /// Executable to invoke. Default: "dbt".
    #[serde(default = "default_transform_command")]
    pub command: String,
    #[serde(default = "default_dir")]
    pub project_dir: String,
    #[serde(default = "default_dir")]
    pub profiles_dir: String,
    /// Model selector passed as `--models`. Empty or absent runs every model.
    #[serde(default)]
    pub models: Option<String>,
    #[serde(default = "default_transform_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_transform_command() -> String {
    "dbt".into()
}
fn default_dir() -> String {
    ".".into()
}
fn default_transform_timeout_secs() -> u64 {
    300
}

impl TransformConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            command: default_transform_command(),
            project_dir: default_dir(),
            profiles_dir: default_dir(),
            models: None,
            timeout_secs: default_transform_timeout_secs(),
        }
    }
}

/// Settings for the Metabase dashboard cache refresh.
#[derive(Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_dashboard_base_url")]
    pub base_url: String,
    /// Public dashboard link shown on the edit page.
    #[serde(default)]
    pub dashboard_url: Option<String>,
    /// Session key sent as `X-Metabase-Session`.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_dashboard_database_id")]
    pub database_id: Option<u32>,
    /// Pause before calling Metabase so the transformation run can settle.
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_dashboard_base_url() -> String {
    "https://hkh-metabase.onrender.com".into()
}
fn default_dashboard_database_id() -> Option<u32> {
    Some(3)
}
fn default_settle_delay_secs() -> u64 {
    5
}
fn default_request_timeout_secs() -> u64 {
    30
}

impl DashboardConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: default_dashboard_base_url(),
            dashboard_url: None,
            api_key: None,
            database_id: default_dashboard_database_id(),
            settle_delay_secs: default_settle_delay_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("base_url", &self.base_url)
            .field("dashboard_url", &self.dashboard_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("database_id", &self.database_id)
            .field("settle_delay_secs", &self.settle_delay_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Post-update refresh hooks. Disabled by default.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HooksConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}
