//! Best-effort notifications sent to downstream systems after the staging
//! table changes: a `dbt run` to rebuild derived models and a Metabase
//! schema sync so dashboards pick up the new values.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::config::{DashboardConfig, HooksConfig, TransformConfig};

#[async_trait]
pub trait RefreshHooks: Send + Sync {
    /// Rebuild downstream transformation models. `models` narrows the run to
    /// a selector. Returns whether the run succeeded within `timeout`.
    async fn refresh_transformations(&self, models: Option<&str>, timeout: Duration) -> bool;

    /// Ask the dashboard to resync its cache.
    async fn refresh_dashboard(&self) -> bool;
}

/// Refresh hooks backed by the `dbt` CLI and the Metabase HTTP API.
pub struct ExternalRefreshHooks {
    transform: TransformConfig,
    dashboard: DashboardConfig,
    client: Client,
}

impl ExternalRefreshHooks {
    pub fn new(config: &HooksConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.dashboard.request_timeout())
            .build()?;

        Ok(Self {
            transform: config.transform.clone(),
            dashboard: config.dashboard.clone(),
            client,
        })
    }

    fn transform_args(&self, models: Option<&str>) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--profiles-dir".to_string(),
            self.transform.profiles_dir.clone(),
            "--project-dir".to_string(),
            self.transform.project_dir.clone(),
        ];
        if let Some(models) = models.filter(|m| !m.trim().is_empty()) {
            args.push("--models".to_string());
            args.push(models.to_string());
        }
        args
    }

    async fn post_dashboard(
        &self,
        database_id: u32,
        api_key: &str,
        action: &str,
    ) -> Result<StatusCode, reqwest::Error> {
        let url = format!(
            "{}/api/database/{database_id}/{action}",
            self.dashboard.base_url.trim_end_matches('/')
        );
        let res = self
            .client
            .post(url)
            .header("X-Metabase-Session", api_key)
            .send()
            .await?;
        Ok(res.status())
    }
}

#[async_trait]
impl RefreshHooks for ExternalRefreshHooks {
    async fn refresh_transformations(&self, models: Option<&str>, timeout: Duration) -> bool {
        info!(command = %self.transform.command, models, "Running transformation models");

        let mut cmd = Command::new(&self.transform.command);
        cmd.args(self.transform_args(models)).kill_on_drop(true);

        match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                info!("Transformation models refreshed");
                true
            }
            Ok(Ok(output)) => {
                error!(
                    status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    stdout = %String::from_utf8_lossy(&output.stdout),
                    "Transformation run failed"
                );
                false
            }
            Ok(Err(e)) => {
                error!(error = %e, "Transformation run could not be started");
                false
            }
            Err(_) => {
                error!(timeout_secs = timeout.as_secs(), "Transformation run timed out");
                false
            }
        }
    }

    // A missing key/database id and transport errors both report success.
    // Callers have always treated the dashboard as optional, so keep that.
    async fn refresh_dashboard(&self) -> bool {
        tokio::time::sleep(self.dashboard.settle_delay()).await;

        let (Some(api_key), Some(database_id)) =
            (self.dashboard.api_key.as_deref(), self.dashboard.database_id)
        else {
            warn!("Dashboard API key or database ID not configured");
            return true;
        };

        info!(database_id, "Triggering dashboard refresh");

        let sync = match self.post_dashboard(database_id, api_key, "sync_schema").await {
            Ok(status) => status,
            Err(e) => {
                error!(error = %e, "Dashboard refresh failed");
                return true;
            }
        };

        if let Err(e) = self.post_dashboard(database_id, api_key, "rescan_values").await {
            error!(error = %e, "Dashboard refresh failed");
            return true;
        }

        if sync == StatusCode::OK {
            info!("Dashboard schema sync triggered");
        } else {
            warn!(status = %sync, "Dashboard schema sync failed");
        }
        sync == StatusCode::OK
    }
}

/// Run both refreshes in order, logging their outcome.
pub async fn run_after_update(
    hooks: &dyn RefreshHooks,
    models: Option<&str>,
    timeout: Duration,
) -> (bool, bool) {
    let transformed = hooks.refresh_transformations(models, timeout).await;
    let dashboard = hooks.refresh_dashboard().await;
    info!(transformed, dashboard, "Post-update refresh finished");
    (transformed, dashboard)
}

/// Fire the post-update refreshes on a detached task. Nothing waits on it.
pub fn spawn_after_update(hooks: Arc<dyn RefreshHooks>, models: Option<String>, timeout: Duration) {
    tokio::spawn(async move {
        run_after_update(hooks.as_ref(), models.as_deref(), timeout).await;
    });
}
