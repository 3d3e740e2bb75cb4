use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use common::RefreshHooks;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::flash;
use crate::service::ServiceError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// `None` when post-update hooks are disabled.
    pub hooks: Option<Arc<dyn RefreshHooks>>,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(config: AppConfig, hooks: Option<Arc<dyn RefreshHooks>>) -> Self {
        let cookie_key = flash::signing_key(&config.server.secret_key);
        Self {
            config: Arc::new(config),
            hooks,
            cookie_key,
        }
    }

    /// Open the connection for the current request.
    pub async fn connect(&self) -> Result<DatabaseConnection, ServiceError> {
        Ok(common::database::connect(&self.config.database).await?)
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
