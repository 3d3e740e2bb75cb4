pub mod config;
pub mod database;
pub mod hooks;
pub mod retry;

pub use config::{DashboardConfig, DatabaseConfig, HooksConfig, SslMode, TransformConfig};
pub use hooks::{ExternalRefreshHooks, RefreshHooks};
