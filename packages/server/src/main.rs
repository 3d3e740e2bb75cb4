use std::sync::Arc;

use anyhow::Context;
use common::{ExternalRefreshHooks, RefreshHooks};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use server::config::{AppConfig, RunMode};
use server::state::AppState;

const DEFAULT_SECRET: &str = "dev-key-change-in-production";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.app.run_mode.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(run_mode = ?config.app.run_mode, "Property editor starting");
    if config.app.run_mode == RunMode::Production && config.server.secret_key == DEFAULT_SECRET {
        warn!("server.secret_key is the development default; flash cookies can be forged");
    }

    match common::database::connect_with_retry(&config.database).await {
        Ok(db) => {
            info!("Database reachable");
            if config.database.ensure_table {
                server::database::ensure_schema(&db)
                    .await
                    .context("Failed to create staging table")?;
            }
        }
        Err(e) if config.database.ensure_table => {
            return Err(e).context("Failed to connect to database");
        }
        // Pages report the outage per request until the database comes back.
        Err(e) => warn!(error = %e, "Database unreachable at startup, serving anyway"),
    }

    let hooks: Option<Arc<dyn RefreshHooks>> = if config.hooks.enabled {
        let hooks = ExternalRefreshHooks::new(&config.hooks).context("Failed to build refresh hooks")?;
        info!(command = %config.hooks.transform.command, "Post-update refresh hooks enabled");
        Some(Arc::new(hooks))
    } else {
        None
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = server::build_router(AppState::new(config, hooks));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
